use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 轮次参与记录实体
/// 说明:
/// - 每轮每用户一条；weight = 签到天数 ×（全勤则乘系数）
/// - weight=0 的用户仅作记录，不进入抽取池
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_round_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 所属轮次 (lottery_rounds.id)
    pub round_id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    /// 周期内签到天数
    pub checkin_days: i32,
    /// 抽奖权重
    pub weight: i64,
    /// 是否全勤
    pub is_full_attendance: bool,
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
