//! # 套餐管理处理器

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use entity::{members, members::Entity as Members, packages, packages::Entity as Packages};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::{PaginationParams, build_page, validate_name_format};

/// 套餐查询参数
#[derive(Debug, Deserialize)]
pub struct PackageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// 状态过滤
    pub status: Option<String>,
}

/// 创建套餐请求
#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    /// 有效天数，必须大于 0
    pub duration_days: i32,
    /// 价格（分），不能为负
    pub price_cents: i64,
}

/// 更新套餐请求
#[derive(Debug, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_days: Option<i32>,
    pub price_cents: Option<i64>,
    pub status: Option<String>,
}

/// 套餐响应
#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub price_cents: i64,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<packages::Model> for PackageResponse {
    fn from(package: packages::Model) -> Self {
        Self {
            id: package.id,
            name: package.name,
            description: package.description,
            duration_days: package.duration_days,
            price_cents: package.price_cents,
            status: if package.is_active {
                "active".to_string()
            } else {
                "inactive".to_string()
            },
            created_at: package.created_at.and_utc(),
            updated_at: package.updated_at.and_utc(),
        }
    }
}

/// 列出套餐
pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<PackageQuery>,
) -> Response {
    let params = PaginationParams::new(query.page, query.limit, 20, 100);

    let mut select = Packages::find();
    if let Some(status) = &query.status {
        match status.as_str() {
            "active" => select = select.filter(packages::Column::IsActive.eq(true)),
            "inactive" => select = select.filter(packages::Column::IsActive.eq(false)),
            _ => {}
        }
    }

    let packages_list = match select
        .clone()
        .offset(params.offset())
        .limit(params.limit)
        .order_by_asc(packages::Column::Id)
        .all(state.database.as_ref())
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch packages: {err}");
            return response::app_error(err.into());
        }
    };

    let total = match select.count(state.database.as_ref()).await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count packages: {err}");
            return response::app_error(err.into());
        }
    };

    let data: Vec<PackageResponse> = packages_list
        .into_iter()
        .map(PackageResponse::from)
        .collect();

    response::paginated(data, build_page(total, params).into())
}

/// 校验套餐数值字段
fn validate_package_numbers(duration_days: i32, price_cents: i64) -> Result<(), ConsoleError> {
    if duration_days <= 0 {
        return Err(ConsoleError::validation("有效天数必须大于 0"));
    }
    if price_cents < 0 {
        return Err(ConsoleError::validation("价格不能为负"));
    }
    Ok(())
}

/// 创建套餐
pub async fn create_package(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<CreatePackageRequest>,
) -> Response {
    if let Err(err) = validate_name_format(&request.name) {
        return response::app_error(err);
    }
    if let Err(err) = validate_package_numbers(request.duration_days, request.price_cents) {
        return response::app_error(err);
    }

    // 名称唯一
    match Packages::find()
        .filter(packages::Column::Name.eq(request.name.trim()))
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(_)) => {
            return response::app_error(ConsoleError::conflict("同名套餐已存在"));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!("Failed to check existing package: {err}");
            return response::app_error(err.into());
        }
    }

    let now = Utc::now().naive_utc();
    let package = packages::ActiveModel {
        name: Set(request.name.trim().to_string()),
        description: Set(request.description),
        duration_days: Set(request.duration_days),
        price_cents: Set(request.price_cents),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match package.insert(state.database.as_ref()).await {
        Ok(created) => response::success_with_message(PackageResponse::from(created), "创建成功"),
        Err(err) => {
            tracing::error!("Failed to create package: {err}");
            response::app_error(err.into())
        }
    }
}

/// 获取单个套餐
pub async fn get_package(State(state): State<AppState>, Path(package_id): Path<i32>) -> Response {
    match Packages::find_by_id(package_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(package)) => response::success(PackageResponse::from(package)),
        Ok(None) => {
            response::app_error(ConsoleError::not_found(format!("套餐不存在: {package_id}")))
        }
        Err(err) => {
            tracing::error!("Failed to fetch package {package_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 更新套餐
pub async fn update_package(
    State(state): State<AppState>,
    Path(package_id): Path<i32>,
    axum::Json(request): axum::Json<UpdatePackageRequest>,
) -> Response {
    let package = match Packages::find_by_id(package_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(package)) => package,
        Ok(None) => {
            return response::app_error(ConsoleError::not_found(format!(
                "套餐不存在: {package_id}"
            )));
        }
        Err(err) => {
            tracing::error!("Failed to fetch package for update: {err}");
            return response::app_error(err.into());
        }
    };

    if let Some(name) = &request.name {
        if let Err(err) = validate_name_format(name) {
            return response::app_error(err);
        }
        match Packages::find()
            .filter(packages::Column::Name.eq(name.trim()))
            .filter(packages::Column::Id.ne(package_id))
            .one(state.database.as_ref())
            .await
        {
            Ok(Some(_)) => {
                return response::app_error(ConsoleError::conflict("同名套餐已存在"));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!("Failed to check package name uniqueness: {err}");
                return response::app_error(err.into());
            }
        }
    }

    if let Err(err) = validate_package_numbers(
        request.duration_days.unwrap_or(package.duration_days),
        request.price_cents.unwrap_or(package.price_cents),
    ) {
        return response::app_error(err);
    }

    let mut active_model: packages::ActiveModel = package.into();
    if let Some(name) = request.name {
        active_model.name = Set(name.trim().to_string());
    }
    if let Some(description) = request.description {
        active_model.description = Set(Some(description));
    }
    if let Some(duration_days) = request.duration_days {
        active_model.duration_days = Set(duration_days);
    }
    if let Some(price_cents) = request.price_cents {
        active_model.price_cents = Set(price_cents);
    }
    if let Some(status) = request.status {
        match status.as_str() {
            "active" => active_model.is_active = Set(true),
            "inactive" => active_model.is_active = Set(false),
            _ => {
                return response::app_error(ConsoleError::validation(format!(
                    "无效的状态: {status}"
                )));
            }
        }
    }
    active_model.updated_at = Set(Utc::now().naive_utc());

    match active_model.update(state.database.as_ref()).await {
        Ok(updated) => response::success_with_message(PackageResponse::from(updated), "更新成功"),
        Err(err) => {
            tracing::error!("Failed to update package {package_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 删除套餐
///
/// 仍被会员引用的套餐不可删除。
pub async fn delete_package(
    State(state): State<AppState>,
    Path(package_id): Path<i32>,
) -> Response {
    let in_use = match Members::find()
        .filter(members::Column::PackageId.eq(package_id))
        .count(state.database.as_ref())
        .await
    {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count members for package {package_id}: {err}");
            return response::app_error(err.into());
        }
    };

    if in_use > 0 {
        return response::app_error(ConsoleError::conflict(format!(
            "套餐仍被 {in_use} 名会员使用，无法删除"
        )));
    }

    match Packages::delete_by_id(package_id)
        .exec(state.database.as_ref())
        .await
    {
        Ok(result) if result.rows_affected == 0 => {
            response::app_error(ConsoleError::not_found(format!("套餐不存在: {package_id}")))
        }
        Ok(_) => response::success_without_data("删除成功"),
        Err(err) => {
            tracing::error!("Failed to delete package {package_id}: {err}");
            response::app_error(err.into())
        }
    }
}
