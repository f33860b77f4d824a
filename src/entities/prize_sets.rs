use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "prize_set_type")]
#[serde(rename_all = "snake_case")]
pub enum PrizeSetType {
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

impl std::fmt::Display for PrizeSetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeSetType::Weekly => write!(f, "weekly"),
        }
    }
}

/// 奖池版本实体
/// 说明:
/// - 奖池按周期版本化：[valid_from, valid_to] 覆盖某周则该周使用这套奖品
/// - valid_to NULL 表示长期有效（管理员手工建的初始奖池）
/// - 缺失时由 PrizeService 从最近一套克隆（沿用上周奖品）
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prize_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub chat_id: i64,
    pub set_type: PrizeSetType,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
