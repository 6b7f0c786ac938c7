//! # 场馆设置处理器
//!
//! 设置为单行记录，由迁移初始化；仅管理员可修改。

use axum::extract::{Extension, State};
use axum::response::Response;
use chrono::Utc;
use entity::{gym_settings, gym_settings::Entity as GymSettings};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ConsoleError;
use crate::management::middleware::AuthContext;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::validate_email_format;

/// 更新设置请求
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub gym_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub currency: Option<String>,
}

/// 设置响应
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub gym_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub currency: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<gym_settings::Model> for SettingsResponse {
    fn from(settings: gym_settings::Model) -> Self {
        Self {
            gym_name: settings.gym_name,
            contact_email: settings.contact_email,
            contact_phone: settings.contact_phone,
            address: settings.address,
            opening_hours: settings.opening_hours,
            currency: settings.currency,
            updated_at: settings.updated_at.and_utc(),
        }
    }
}

/// 读取设置行（应由迁移保证存在）
async fn load_settings(state: &AppState) -> Result<gym_settings::Model, ConsoleError> {
    GymSettings::find()
        .one(state.database.as_ref())
        .await?
        .ok_or_else(|| ConsoleError::internal("场馆设置未初始化"))
}

/// 获取设置
pub async fn get_settings(State(state): State<AppState>) -> Response {
    match load_settings(&state).await {
        Ok(settings) => response::success(SettingsResponse::from(settings)),
        Err(err) => {
            tracing::error!("Failed to load settings: {err}");
            response::app_error(err)
        }
    }
}

/// 更新设置（仅管理员）
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    axum::Json(request): axum::Json<UpdateSettingsRequest>,
) -> Response {
    if !auth.is_admin {
        return response::app_error(ConsoleError::permission("仅管理员可修改场馆设置"));
    }

    if let Some(email) = &request.contact_email
        && let Err(err) = validate_email_format(email)
    {
        return response::app_error(err);
    }

    let settings = match load_settings(&state).await {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("Failed to load settings for update: {err}");
            return response::app_error(err);
        }
    };

    let mut active_model: gym_settings::ActiveModel = settings.into();
    if let Some(gym_name) = request.gym_name {
        active_model.gym_name = Set(gym_name);
    }
    if let Some(contact_email) = request.contact_email {
        active_model.contact_email = Set(contact_email.trim().to_string());
    }
    if let Some(contact_phone) = request.contact_phone {
        active_model.contact_phone = Set(Some(contact_phone));
    }
    if let Some(address) = request.address {
        active_model.address = Set(Some(address));
    }
    if let Some(opening_hours) = request.opening_hours {
        active_model.opening_hours = Set(Some(opening_hours));
    }
    if let Some(currency) = request.currency {
        active_model.currency = Set(currency);
    }
    active_model.updated_at = Set(Utc::now().naive_utc());

    match active_model.update(state.database.as_ref()).await {
        Ok(updated) => response::success_with_message(SettingsResponse::from(updated), "更新成功"),
        Err(err) => {
            tracing::error!("Failed to update settings: {err}");
            response::app_error(err.into())
        }
    }
}
