use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::lottery_settings_entity as settings;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SettingsQuery {
    pub chat_id: i64,
}

/// 更新设置，字段缺省表示不变
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub chat_id: i64,
    pub weekly_enabled: Option<bool>,
    pub weekly_draw_at: Option<NaiveTime>,
    pub full_attendance_factor: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub chat_id: i64,
    pub weekly_enabled: bool,
    pub weekly_draw_at: NaiveTime,
    pub full_attendance_factor: i32,
    pub timezone: String,
}

impl From<settings::Model> for SettingsResponse {
    fn from(m: settings::Model) -> Self {
        SettingsResponse {
            chat_id: m.chat_id,
            weekly_enabled: m.weekly_enabled,
            weekly_draw_at: m.weekly_draw_at,
            full_attendance_factor: m.full_attendance_factor,
            timezone: m.timezone,
        }
    }
}
