//! # 缴费管理处理器

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use entity::{members::Entity as Members, payments, payments::Entity as Payments};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::{PaginationParams, build_page};

/// 合法的支付方式
const PAYMENT_METHODS: [&str; 3] = ["cash", "card", "transfer"];

/// 合法的支付状态
const PAYMENT_STATUSES: [&str; 3] = ["completed", "pending", "refunded"];

/// 缴费查询参数
#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// 会员过滤
    pub member_id: Option<i32>,
    /// 状态过滤
    pub status: Option<String>,
    /// 支付方式过滤
    pub method: Option<String>,
}

/// 创建缴费记录请求
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub member_id: i32,
    /// 金额（分），必须大于 0
    pub amount_cents: i64,
    /// cash / card / transfer
    pub method: String,
    /// completed / pending / refunded，默认 completed
    pub status: Option<String>,
    /// 缴费时间，缺省为当前时间
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub note: Option<String>,
}

/// 缴费记录响应
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: i32,
    pub member_id: i32,
    pub amount_cents: i64,
    pub method: String,
    pub status: String,
    pub paid_at: chrono::DateTime<chrono::Utc>,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(payment: payments::Model) -> Self {
        Self {
            id: payment.id,
            member_id: payment.member_id,
            amount_cents: payment.amount_cents,
            method: payment.method,
            status: payment.status,
            paid_at: payment.paid_at.and_utc(),
            note: payment.note,
            created_at: payment.created_at.and_utc(),
        }
    }
}

fn apply_filters(mut select: Select<Payments>, query: &PaymentQuery) -> Select<Payments> {
    if let Some(member_id) = query.member_id {
        select = select.filter(payments::Column::MemberId.eq(member_id));
    }
    if let Some(status) = query
        .status
        .as_deref()
        .filter(|s| PAYMENT_STATUSES.contains(s))
    {
        select = select.filter(payments::Column::Status.eq(status));
    }
    if let Some(method) = query
        .method
        .as_deref()
        .filter(|m| PAYMENT_METHODS.contains(m))
    {
        select = select.filter(payments::Column::Method.eq(method));
    }
    select
}

/// 列出缴费记录
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> Response {
    let params = PaginationParams::new(query.page, query.limit, 20, 100);

    let select = apply_filters(Payments::find(), &query);

    let payments_list = match select
        .clone()
        .offset(params.offset())
        .limit(params.limit)
        .order_by_desc(payments::Column::PaidAt)
        .all(state.database.as_ref())
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch payments: {err}");
            return response::app_error(err.into());
        }
    };

    let total = match select.count(state.database.as_ref()).await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count payments: {err}");
            return response::app_error(err.into());
        }
    };

    let data: Vec<PaymentResponse> = payments_list
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    response::paginated(data, build_page(total, params).into())
}

/// 创建缴费记录
pub async fn create_payment(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<CreatePaymentRequest>,
) -> Response {
    if request.amount_cents <= 0 {
        return response::app_error(ConsoleError::validation("金额必须大于 0"));
    }
    if !PAYMENT_METHODS.contains(&request.method.as_str()) {
        return response::app_error(ConsoleError::validation(format!(
            "无效的支付方式: {}",
            request.method
        )));
    }
    let status = request.status.unwrap_or_else(|| "completed".to_string());
    if !PAYMENT_STATUSES.contains(&status.as_str()) {
        return response::app_error(ConsoleError::validation(format!("无效的状态: {status}")));
    }

    // 会员必须存在
    match Members::find_by_id(request.member_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(_)) => {}
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
    }

    let now = Utc::now().naive_utc();
    let paid_at = request.paid_at.map_or(now, |dt| dt.naive_utc());

    let payment = payments::ActiveModel {
        member_id: Set(request.member_id),
        amount_cents: Set(request.amount_cents),
        method: Set(request.method),
        status: Set(status),
        paid_at: Set(paid_at),
        note: Set(request.note),
        created_at: Set(now),
        ..Default::default()
    };

    match payment.insert(state.database.as_ref()).await {
        Ok(created) => response::success_with_message(PaymentResponse::from(created), "创建成功"),
        Err(err) => {
            tracing::error!("Failed to create payment: {err}");
            response::app_error(err.into())
        }
    }
}

/// 获取单条缴费记录
pub async fn get_payment(State(state): State<AppState>, Path(payment_id): Path<i32>) -> Response {
    match Payments::find_by_id(payment_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(payment)) => response::success(PaymentResponse::from(payment)),
        Ok(None) => response::app_error(ConsoleError::not_found(format!(
            "缴费记录不存在: {payment_id}"
        ))),
        Err(err) => {
            tracing::error!("Failed to fetch payment {payment_id}: {err}");
            response::app_error(err.into())
        }
    }
}
