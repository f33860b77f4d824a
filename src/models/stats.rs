use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DailyStatsQuery {
    pub chat_id: i64,
    /// 统计的北京自然日，缺省为昨天
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WeekStatsQuery {
    pub chat_id: i64,
    /// 所在周的任意一天，缺省为今天
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyStatsResponse {
    pub date: NaiveDate,
    /// 当日签到人数（去重）
    pub user_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeekStatsResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DailyStatsResponse>,
}
