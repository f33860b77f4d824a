use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 中奖记录实体
/// 说明:
/// - 每轮每用户至多中一个奖
/// - 奖品名称/描述/名次冗余存储，奖池后续改动不影响历史回溯
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 所属轮次 (lottery_rounds.id)
    pub round_id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    /// 开奖所用奖池 (历史快照)
    pub prize_set_id: Option<i64>,
    /// 奖品名称 (历史快照)
    pub prize_name: String,
    pub prize_description: Option<String>,
    /// 奖项名次（与奖品条目 prize_rank 一致）
    pub prize_rank: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::lottery_rounds::Entity",
        from = "Column::RoundId",
        to = "crate::entities::lottery_rounds::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Round,
}

impl ActiveModelBehavior for ActiveModel {}
