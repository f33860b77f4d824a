use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品条目实体
/// 说明:
/// - prize_rank 小的先抽（rank=1 为头奖），quantity 为该奖项独立名额数
/// - prize_rank 为 NULL 的条目排在最后，克隆时按原顺序补 1..n
/// - enabled=false 的条目不参与开奖，也不会被克隆到下一周期
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prize_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 所属奖池 (prize_sets.id)
    pub set_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 名额数 (>=1)
    pub quantity: i32,
    pub enabled: bool,
    /// 抽取顺序，升序
    pub prize_rank: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::prize_sets::Entity",
        from = "Column::SetId",
        to = "crate::entities::prize_sets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Set,
}

impl ActiveModelBehavior for ActiveModel {}
