//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};

use crate::gateway;
use crate::management::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    // 无需控制台登录态的路由：登录入口与网关转发
    // （网关只透传 Authorization，由上游完成鉴权）
    let public_routes = Router::new()
        .route(
            "/auth/login",
            post(crate::management::handlers::auth::login),
        )
        .merge(gateway::handler::routes());

    // 控制台登录态保护的路由
    let protected_routes = Router::new()
        // 会员管理路由
        .nest("/members", member_routes())
        // 教练管理路由
        .nest("/trainers", trainer_routes())
        // 套餐管理路由
        .nest("/packages", package_routes())
        // 缴费管理路由
        .nest("/payments", payment_routes())
        // 到店打卡路由
        .nest("/attendance", attendance_routes())
        // 场馆设置路由
        .nest("/settings", settings_routes())
        // Dashboard统计路由
        .nest("/dashboard", dashboard_routes())
        .route(
            "/auth/validate",
            get(crate::management::handlers::auth::validate_token),
        )
        .route(
            "/auth/logout",
            post(crate::management::handlers::auth::logout),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::management::middleware::auth::auth,
        ));

    public_routes.merge(protected_routes).with_state(state)
}

/// 会员管理路由
fn member_routes() -> Router<AppState> {
    use axum::routing::{delete, put};
    Router::new()
        .route("/", get(crate::management::handlers::members::list_members))
        .route(
            "/",
            post(crate::management::handlers::members::create_member),
        )
        .route(
            "/{id}",
            get(crate::management::handlers::members::get_member),
        )
        .route(
            "/{id}",
            put(crate::management::handlers::members::update_member),
        )
        .route(
            "/{id}",
            delete(crate::management::handlers::members::delete_member),
        )
}

/// 教练管理路由
fn trainer_routes() -> Router<AppState> {
    use axum::routing::{delete, put};
    Router::new()
        .route(
            "/",
            get(crate::management::handlers::trainers::list_trainers),
        )
        .route(
            "/",
            post(crate::management::handlers::trainers::create_trainer),
        )
        .route(
            "/{id}",
            get(crate::management::handlers::trainers::get_trainer),
        )
        .route(
            "/{id}",
            put(crate::management::handlers::trainers::update_trainer),
        )
        .route(
            "/{id}",
            delete(crate::management::handlers::trainers::delete_trainer),
        )
}

/// 套餐管理路由
fn package_routes() -> Router<AppState> {
    use axum::routing::{delete, put};
    Router::new()
        .route(
            "/",
            get(crate::management::handlers::packages::list_packages),
        )
        .route(
            "/",
            post(crate::management::handlers::packages::create_package),
        )
        .route(
            "/{id}",
            get(crate::management::handlers::packages::get_package),
        )
        .route(
            "/{id}",
            put(crate::management::handlers::packages::update_package),
        )
        .route(
            "/{id}",
            delete(crate::management::handlers::packages::delete_package),
        )
}

/// 缴费管理路由
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crate::management::handlers::payments::list_payments),
        )
        .route(
            "/",
            post(crate::management::handlers::payments::create_payment),
        )
        .route(
            "/{id}",
            get(crate::management::handlers::payments::get_payment),
        )
}

/// 到店打卡路由
fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crate::management::handlers::attendance::list_attendance),
        )
        .route(
            "/check-in",
            post(crate::management::handlers::attendance::check_in),
        )
        .route(
            "/{id}/check-out",
            post(crate::management::handlers::attendance::check_out),
        )
}

/// 场馆设置路由
fn settings_routes() -> Router<AppState> {
    use axum::routing::put;
    Router::new()
        .route(
            "/",
            get(crate::management::handlers::settings::get_settings),
        )
        .route(
            "/",
            put(crate::management::handlers::settings::update_settings),
        )
}

/// Dashboard统计路由
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/overview",
            get(crate::management::handlers::dashboard::get_overview),
        )
        .route(
            "/revenue-trend",
            get(crate::management::handlers::dashboard::get_revenue_trend),
        )
        .route(
            "/membership-distribution",
            get(crate::management::handlers::dashboard::get_membership_distribution),
        )
}
