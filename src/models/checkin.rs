use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 记录签到请求（消息接入层转发消息元数据）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecordCheckinRequest {
    pub chat_id: i64,
    pub user_id: i64,
    pub message_id: i64,
    /// 消息时间（UTC），签到落在该时刻对应的北京自然日
    pub message_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CheckinStatusQuery {
    pub chat_id: i64,
    pub user_id: i64,
}

/// 用户签到状态响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckinStatusResponse {
    /// 今天是否已签到
    pub today_checked: bool,
    /// 本周已签到天数
    pub week_checkin_count: i64,
    /// 查询所用的北京自然日
    pub checkin_date: NaiveDate,
}
