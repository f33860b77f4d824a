use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 每日签到实体
/// 说明:
/// - checkin_date 是北京时区的自然日，一个 (chat_id, user_id, checkin_date) 最多一条
/// - 当天重复发言只刷新 message_id / message_time，不新增记录
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_checkins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 群ID
    pub chat_id: i64,
    /// 用户ID
    pub user_id: i64,
    /// 签到日期（北京时区自然日）
    pub checkin_date: NaiveDate,
    /// 触发签到的消息ID
    pub message_id: i64,
    /// 消息时间
    pub message_time: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
