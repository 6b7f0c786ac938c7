//! # 到店打卡处理器

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use entity::{attendance, attendance::Entity as Attendance, members::Entity as Members};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::{PaginationParams, build_page};

/// 打卡查询参数
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// 会员过滤
    pub member_id: Option<i32>,
    /// 日期过滤（YYYY-MM-DD）
    pub date: Option<String>,
}

/// 入馆打卡请求
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub member_id: i32,
}

/// 打卡记录响应
#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub id: i32,
    pub member_id: i32,
    pub checked_in_at: chrono::DateTime<chrono::Utc>,
    pub checked_out_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<attendance::Model> for AttendanceResponse {
    fn from(visit: attendance::Model) -> Self {
        Self {
            id: visit.id,
            member_id: visit.member_id,
            checked_in_at: visit.checked_in_at.and_utc(),
            checked_out_at: visit.checked_out_at.map(|dt| dt.and_utc()),
        }
    }
}

fn apply_filters(
    mut select: Select<Attendance>,
    query: &AttendanceQuery,
) -> Result<Select<Attendance>, ConsoleError> {
    if let Some(member_id) = query.member_id {
        select = select.filter(attendance::Column::MemberId.eq(member_id));
    }

    if let Some(date) = &query.date {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ConsoleError::validation(format!("无效的日期: {date}")))?;
        let start = day.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = start + chrono::Duration::days(1);
        select = select
            .filter(attendance::Column::CheckedInAt.gte(start))
            .filter(attendance::Column::CheckedInAt.lt(end));
    }

    Ok(select)
}

/// 列出打卡记录
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    let params = PaginationParams::new(query.page, query.limit, 20, 100);

    let select = match apply_filters(Attendance::find(), &query) {
        Ok(select) => select,
        Err(err) => return response::app_error(err),
    };

    let visits = match select
        .clone()
        .offset(params.offset())
        .limit(params.limit)
        .order_by_desc(attendance::Column::CheckedInAt)
        .all(state.database.as_ref())
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch attendance: {err}");
            return response::app_error(err.into());
        }
    };

    let total = match select.count(state.database.as_ref()).await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count attendance: {err}");
            return response::app_error(err.into());
        }
    };

    let data: Vec<AttendanceResponse> = visits.into_iter().map(AttendanceResponse::from).collect();

    response::paginated(data, build_page(total, params).into())
}

/// 入馆打卡
///
/// 同一会员存在未结束的打卡时拒绝重复打卡。
pub async fn check_in(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<CheckInRequest>,
) -> Response {
    // 会员必须存在且处于激活状态
    let member = match Members::find_by_id(request.member_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(member)) => member,
        Ok(None) => {
            return response::app_error(ConsoleError::validation(format!(
                "会员不存在: {}",
                request.member_id
            )));
        }
        Err(err) => {
            tracing::error!("Failed to check member {}: {err}", request.member_id);
            return response::app_error(err.into());
        }
    };

    if !member.is_active {
        return response::app_error(ConsoleError::business(format!(
            "会员已停用，无法打卡: {}",
            member.id
        )));
    }

    // 不允许重复打卡
    match Attendance::find()
        .filter(attendance::Column::MemberId.eq(request.member_id))
        .filter(attendance::Column::CheckedOutAt.is_null())
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(_)) => {
            return response::app_error(ConsoleError::conflict("该会员已有未结束的打卡记录"));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!("Failed to check open visit: {err}");
            return response::app_error(err.into());
        }
    }

    let now = Utc::now().naive_utc();
    let visit = attendance::ActiveModel {
        member_id: Set(request.member_id),
        checked_in_at: Set(now),
        checked_out_at: Set(None),
        created_at: Set(now),
        ..Default::default()
    };

    match visit.insert(state.database.as_ref()).await {
        Ok(created) => response::success_with_message(AttendanceResponse::from(created), "打卡成功"),
        Err(err) => {
            tracing::error!("Failed to create attendance record: {err}");
            response::app_error(err.into())
        }
    }
}

/// 离馆打卡
pub async fn check_out(State(state): State<AppState>, Path(visit_id): Path<i32>) -> Response {
    let visit = match Attendance::find_by_id(visit_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(visit)) => visit,
        Ok(None) => {
            return response::app_error(ConsoleError::not_found(format!(
                "打卡记录不存在: {visit_id}"
            )));
        }
        Err(err) => {
            tracing::error!("Failed to fetch attendance {visit_id}: {err}");
            return response::app_error(err.into());
        }
    };

    if visit.checked_out_at.is_some() {
        return response::app_error(ConsoleError::conflict("该打卡记录已经结束"));
    }

    let mut active_model: attendance::ActiveModel = visit.into();
    active_model.checked_out_at = Set(Some(Utc::now().naive_utc()));

    match active_model.update(state.database.as_ref()).await {
        Ok(updated) => response::success_with_message(AttendanceResponse::from(updated), "已离馆"),
        Err(err) => {
            tracing::error!("Failed to check out visit {visit_id}: {err}");
            response::app_error(err.into())
        }
    }
}
