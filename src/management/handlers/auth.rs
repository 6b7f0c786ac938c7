//! # 认证管理处理器

use axum::extract::{Extension, State};
use axum::response::Response;
use chrono::Utc;
use entity::{users, users::Entity as Users};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::auth::AuthUtils;
use crate::error::ConsoleError;
use crate::management::middleware::AuthContext;
use crate::management::response;
use crate::management::server::AppState;

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 登录响应中的用户信息
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

/// 登录
pub async fn login(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return response::app_error(ConsoleError::validation("用户名和密码不能为空"));
    }

    let user = match Users::find()
        .filter(users::Column::Username.eq(request.username.trim()))
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            // 不区分"用户不存在"与"密码错误"
            return response::app_error(ConsoleError::auth("用户名或密码错误"));
        }
        Err(err) => {
            tracing::error!("Failed to fetch user for login: {err}");
            return response::app_error(err.into());
        }
    };

    match AuthUtils::verify_password(&request.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return response::app_error(ConsoleError::auth("用户名或密码错误"));
        }
        Err(err) => {
            tracing::error!("Failed to verify password: {err}");
            return response::app_error(err);
        }
    }

    if !user.is_active {
        return response::app_error(ConsoleError::permission("账号已停用"));
    }

    let token_pair =
        match state
            .jwt_manager
            .generate_token_pair(user.id, user.username.clone(), user.is_admin)
        {
            Ok(pair) => pair,
            Err(err) => {
                tracing::error!("Failed to generate token pair: {err}");
                return response::app_error(err);
            }
        };

    // 记录最后登录时间，失败不影响登录结果
    let mut active_model: users::ActiveModel = user.clone().into();
    active_model.last_login = Set(Some(Utc::now().naive_utc()));
    active_model.updated_at = Set(Utc::now().naive_utc());
    if let Err(err) = active_model.update(state.database.as_ref()).await {
        tracing::warn!("Failed to record last login for user {}: {err}", user.id);
    }

    response::success(json!({
        "token": token_pair,
        "user": LoginUser {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        },
    }))
}

/// 校验当前令牌
///
/// 认证中间件已完成验证，这里只回显解析出的用户信息。
pub async fn validate_token(Extension(auth): Extension<Arc<AuthContext>>) -> Response {
    response::success(json!({
        "user_id": auth.user_id,
        "username": auth.username,
        "is_admin": auth.is_admin,
    }))
}

/// 退出登录
///
/// 令牌是无状态的，服务端没有会话需要销毁。
pub async fn logout() -> Response {
    response::success_without_data("已退出登录")
}
