//! # 教练管理处理器

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use entity::{trainers, trainers::Entity as Trainers};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::{
    PaginationParams, build_page, validate_email_format, validate_name_format,
};

/// 教练查询参数
#[derive(Debug, Deserialize)]
pub struct TrainerQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// 状态过滤
    pub status: Option<String>,
    /// 专长过滤
    pub specialty: Option<String>,
}

/// 创建教练请求
#[derive(Debug, Deserialize)]
pub struct CreateTrainerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

/// 更新教练请求
#[derive(Debug, Deserialize)]
pub struct UpdateTrainerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<String>,
}

/// 教练响应
#[derive(Debug, Serialize)]
pub struct TrainerResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<trainers::Model> for TrainerResponse {
    fn from(trainer: trainers::Model) -> Self {
        Self {
            id: trainer.id,
            name: trainer.name,
            email: trainer.email,
            phone: trainer.phone,
            specialty: trainer.specialty,
            status: if trainer.is_active {
                "active".to_string()
            } else {
                "inactive".to_string()
            },
            created_at: trainer.created_at.and_utc(),
            updated_at: trainer.updated_at.and_utc(),
        }
    }
}

fn apply_filters(mut select: Select<Trainers>, query: &TrainerQuery) -> Select<Trainers> {
    if let Some(status) = &query.status {
        match status.as_str() {
            "active" => select = select.filter(trainers::Column::IsActive.eq(true)),
            "inactive" => select = select.filter(trainers::Column::IsActive.eq(false)),
            _ => {}
        }
    }

    if let Some(specialty) = query
        .specialty
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        select = select.filter(trainers::Column::Specialty.eq(specialty));
    }

    select
}

/// 列出教练
pub async fn list_trainers(
    State(state): State<AppState>,
    Query(query): Query<TrainerQuery>,
) -> Response {
    let params = PaginationParams::new(query.page, query.limit, 20, 100);

    let select = apply_filters(Trainers::find(), &query);

    let trainers_list = match select
        .clone()
        .offset(params.offset())
        .limit(params.limit)
        .order_by_asc(trainers::Column::Id)
        .all(state.database.as_ref())
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch trainers: {err}");
            return response::app_error(err.into());
        }
    };

    let total = match select.count(state.database.as_ref()).await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count trainers: {err}");
            return response::app_error(err.into());
        }
    };

    let data: Vec<TrainerResponse> = trainers_list
        .into_iter()
        .map(TrainerResponse::from)
        .collect();

    response::paginated(data, build_page(total, params).into())
}

/// 创建教练
pub async fn create_trainer(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<CreateTrainerRequest>,
) -> Response {
    if let Err(err) = validate_name_format(&request.name) {
        return response::app_error(err);
    }
    if let Err(err) = validate_email_format(&request.email) {
        return response::app_error(err);
    }

    // 检查邮箱是否已被占用
    match Trainers::find()
        .filter(trainers::Column::Email.eq(request.email.trim()))
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(_)) => {
            return response::app_error(ConsoleError::conflict("邮箱已被其它教练使用"));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!("Failed to check existing trainer: {err}");
            return response::app_error(err.into());
        }
    }

    let now = Utc::now().naive_utc();
    let trainer = trainers::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(request.email.trim().to_string()),
        phone: Set(request.phone),
        specialty: Set(request.specialty),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match trainer.insert(state.database.as_ref()).await {
        Ok(created) => response::success_with_message(TrainerResponse::from(created), "创建成功"),
        Err(err) => {
            tracing::error!("Failed to create trainer: {err}");
            response::app_error(err.into())
        }
    }
}

/// 获取单个教练
pub async fn get_trainer(State(state): State<AppState>, Path(trainer_id): Path<i32>) -> Response {
    match Trainers::find_by_id(trainer_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(trainer)) => response::success(TrainerResponse::from(trainer)),
        Ok(None) => {
            response::app_error(ConsoleError::not_found(format!("教练不存在: {trainer_id}")))
        }
        Err(err) => {
            tracing::error!("Failed to fetch trainer {trainer_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 更新教练
pub async fn update_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<i32>,
    axum::Json(request): axum::Json<UpdateTrainerRequest>,
) -> Response {
    let trainer = match Trainers::find_by_id(trainer_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(trainer)) => trainer,
        Ok(None) => {
            return response::app_error(ConsoleError::not_found(format!(
                "教练不存在: {trainer_id}"
            )));
        }
        Err(err) => {
            tracing::error!("Failed to fetch trainer for update: {err}");
            return response::app_error(err.into());
        }
    };

    if let Some(name) = &request.name
        && let Err(err) = validate_name_format(name)
    {
        return response::app_error(err);
    }

    if let Some(email) = &request.email {
        if let Err(err) = validate_email_format(email) {
            return response::app_error(err);
        }
        match Trainers::find()
            .filter(trainers::Column::Email.eq(email.trim()))
            .filter(trainers::Column::Id.ne(trainer_id))
            .one(state.database.as_ref())
            .await
        {
            Ok(Some(_)) => {
                return response::app_error(ConsoleError::conflict("邮箱已被其它教练使用"));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!("Failed to check email uniqueness: {err}");
                return response::app_error(err.into());
            }
        }
    }

    let mut active_model: trainers::ActiveModel = trainer.into();
    if let Some(name) = request.name {
        active_model.name = Set(name.trim().to_string());
    }
    if let Some(email) = request.email {
        active_model.email = Set(email.trim().to_string());
    }
    if let Some(phone) = request.phone {
        active_model.phone = Set(Some(phone));
    }
    if let Some(specialty) = request.specialty {
        active_model.specialty = Set(Some(specialty));
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
        Ok(updated) => response::success_with_message(TrainerResponse::from(updated), "更新成功"),
        Err(err) => {
            tracing::error!("Failed to update trainer {trainer_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 删除教练
pub async fn delete_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<i32>,
) -> Response {
    match Trainers::delete_by_id(trainer_id)
        .exec(state.database.as_ref())
        .await
    {
        Ok(result) if result.rows_affected == 0 => {
            response::app_error(ConsoleError::not_found(format!("教练不存在: {trainer_id}")))
        }
        Ok(_) => response::success_without_data("删除成功"),
        Err(err) => {
            tracing::error!("Failed to delete trainer {trainer_id}: {err}");
            response::app_error(err.into())
        }
    }
}
