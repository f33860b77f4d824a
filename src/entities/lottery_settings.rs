use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 每群抽奖设置实体
/// 首次访问自动创建默认行：weekly_enabled=true, 00:00 开奖, 全勤系数 2
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 群ID (唯一)
    pub chat_id: i64,
    /// 周抽奖开关
    pub weekly_enabled: bool,
    /// 周一开奖时间（北京时区）
    pub weekly_draw_at: NaiveTime,
    /// 全勤权重系数
    pub full_attendance_factor: i32,
    /// IANA 时区名（记录用；计算固定 UTC+8）
    pub timezone: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
