//! # Dashboard统计处理器
//!
//! 为控制台首页的卡片与图表提供聚合数据。

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::{Datelike, NaiveDate, Utc};
use entity::{
    attendance, attendance::Entity as Attendance, members, members::Entity as Members,
    packages::Entity as Packages, payments, payments::Entity as Payments,
    trainers, trainers::Entity as Trainers,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::management::response;
use crate::management::server::AppState;

/// 趋势查询参数
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// 统计月数，默认 6，最大 24
    pub months: Option<u32>,
}

/// 概览卡片数据
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    /// 活跃会员数
    pub active_members: u64,
    /// 在职教练数
    pub active_trainers: u64,
    /// 今日到店人次
    pub today_check_ins: u64,
    /// 本月营收（分）
    pub month_revenue_cents: i64,
}

/// 单月营收
#[derive(Debug, Serialize)]
pub struct MonthlyRevenue {
    /// 形如 "2024-03"
    pub month: String,
    pub revenue_cents: i64,
}

/// 套餐分布
#[derive(Debug, Serialize)]
pub struct PackageDistribution {
    pub package_id: i32,
    pub package_name: String,
    pub member_count: u64,
}

/// 月份起点（月初零点）
fn month_start(year: i32, month: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_default()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
}

/// 往前回溯 `back` 个月的 (年, 月)
const fn shift_month(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// 概览卡片
pub async fn get_overview(State(state): State<AppState>) -> Response {
    let db = state.database.as_ref();

    let active_members = match Members::find()
        .filter(members::Column::IsActive.eq(true))
        .count(db)
        .await
    {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count active members: {err}");
            return response::app_error(err.into());
        }
    };

    let active_trainers = match Trainers::find()
        .filter(trainers::Column::IsActive.eq(true))
        .count(db)
        .await
    {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count active trainers: {err}");
            return response::app_error(err.into());
        }
    };

    let now = Utc::now().naive_utc();
    let today_start = now.date().and_hms_opt(0, 0, 0).unwrap_or_default();

    let today_check_ins = match Attendance::find()
        .filter(attendance::Column::CheckedInAt.gte(today_start))
        .count(db)
        .await
    {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count today's check-ins: {err}");
            return response::app_error(err.into());
        }
    };

    let current_month_start = month_start(now.year(), now.month());
    let month_payments = match Payments::find()
        .filter(payments::Column::Status.eq("completed"))
        .filter(payments::Column::PaidAt.gte(current_month_start))
        .all(db)
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch month payments: {err}");
            return response::app_error(err.into());
        }
    };
    let month_revenue_cents: i64 = month_payments.iter().map(|p| p.amount_cents).sum();

    response::success(OverviewResponse {
        active_members,
        active_trainers,
        today_check_ins,
        month_revenue_cents,
    })
}

/// 营收趋势（按月）
pub async fn get_revenue_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Response {
    let months = query.months.unwrap_or(6).clamp(1, 24);

    let now = Utc::now().naive_utc();
    let (start_year, start_month) = shift_month(now.year(), now.month(), months - 1);
    let range_start = month_start(start_year, start_month);

    let paid = match Payments::find()
        .filter(payments::Column::Status.eq("completed"))
        .filter(payments::Column::PaidAt.gte(range_start))
        .all(state.database.as_ref())
        .await
    {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch payments for trend: {err}");
            return response::app_error(err.into());
        }
    };

    // 先铺满所有月份，保证无营收的月份也出现在图表里
    let mut buckets: Vec<MonthlyRevenue> = (0..months)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(now.year(), now.month(), back);
            MonthlyRevenue {
                month: format!("{year:04}-{month:02}"),
                revenue_cents: 0,
            }
        })
        .collect();

    for payment in paid {
        let key = format!(
            "{:04}-{:02}",
            payment.paid_at.year(),
            payment.paid_at.month()
        );
        if let Some(bucket) = buckets.iter_mut().find(|b| b.month == key) {
            bucket.revenue_cents += payment.amount_cents;
        }
    }

    response::success(buckets)
}

/// 会籍分布（按套餐统计活跃会员数）
pub async fn get_membership_distribution(State(state): State<AppState>) -> Response {
    let db = state.database.as_ref();

    let packages_list = match Packages::find().all(db).await {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch packages for distribution: {err}");
            return response::app_error(err.into());
        }
    };

    let mut distribution = Vec::with_capacity(packages_list.len());
    for package in packages_list {
        let member_count = match Members::find()
            .filter(members::Column::PackageId.eq(package.id))
            .filter(members::Column::IsActive.eq(true))
            .count(db)
            .await
        {
            Ok(count) => count,
            Err(err) => {
                tracing::error!("Failed to count members for package {}: {err}", package.id);
                return response::app_error(err.into());
            }
        };

        distribution.push(PackageDistribution {
            package_id: package.id,
            package_name: package.name,
            member_count,
        });
    }

    response::success(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_month_within_year() {
        assert_eq!(shift_month(2024, 6, 0), (2024, 6));
        assert_eq!(shift_month(2024, 6, 5), (2024, 1));
    }

    #[test]
    fn test_shift_month_across_year() {
        assert_eq!(shift_month(2024, 2, 3), (2023, 11));
        assert_eq!(shift_month(2024, 1, 12), (2023, 1));
        assert_eq!(shift_month(2024, 1, 13), (2022, 12));
    }

    #[test]
    fn test_month_start() {
        let start = month_start(2024, 3);
        assert_eq!(start.to_string(), "2024-03-01 00:00:00");
    }
}
