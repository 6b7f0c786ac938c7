//! # 缴费记录实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 缴费记录实体
///
/// `method` 取值 cash / card / transfer；`status` 取值
/// completed / pending / refunded。金额以分为单位。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub member_id: i32,
    pub amount_cents: i64,
    pub method: String,
    pub status: String,
    pub paid_at: DateTime,
    pub note: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id"
    )]
    Members,
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
