use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lottery_round_type")]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundType::Weekly => write!(f, "weekly"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lottery_round_status")]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[sea_orm(string_value = "running")]
    Running,
    #[sea_orm(string_value = "done")]
    Done,
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundStatus::Running => write!(f, "running"),
            RoundStatus::Done => write!(f, "done"),
        }
    }
}

/// 抽奖轮次实体
/// 说明:
/// - (chat_id, round_type, period_start_date, period_end_date) 唯一，这是幂等的根基
/// - 状态只有 running -> done 一条路；done 之后参与/中奖记录不可变
/// - total_participants / total_weight 在标记 done 时一并写入
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub chat_id: i64,
    pub round_type: RoundType,
    pub period_start_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub status: RoundStatus,
    pub total_participants: Option<i32>,
    pub total_weight: Option<i64>,
    pub prize_set_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_done(&self) -> bool {
        self.status == RoundStatus::Done
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
