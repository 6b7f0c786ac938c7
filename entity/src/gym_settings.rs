//! # 场馆设置实体定义
//!
//! 单行配置表，由迁移初始化，控制台只做读取与更新。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 场馆设置实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gym_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub gym_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub currency: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
