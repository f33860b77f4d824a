use crate::error::AppResult;
use crate::models::{DailyStatsResponse, WeekStatsResponse};
use crate::services::CheckinService;
use crate::utils::time_utils;
use chrono::{Duration, NaiveDate};

#[derive(Clone)]
pub struct StatsService {
    checkin_service: CheckinService,
}

impl StatsService {
    pub fn new(checkin_service: CheckinService) -> Self {
        Self { checkin_service }
    }

    pub async fn get_daily_stats(
        &self,
        chat_id: i64,
        date: NaiveDate,
    ) -> AppResult<DailyStatsResponse> {
        let user_count = self.checkin_service.count_checkins_for_date(chat_id, date).await?;
        Ok(DailyStatsResponse { date, user_count })
    }

    /// 目标日期所在周的逐日签到人数
    pub async fn get_week_stats(
        &self,
        chat_id: i64,
        target: NaiveDate,
    ) -> AppResult<WeekStatsResponse> {
        let (week_start, week_end) = time_utils::week_start_end(target);

        let mut days = Vec::with_capacity(7);
        let mut current = week_start;
        while current <= week_end {
            let user_count = self
                .checkin_service
                .count_checkins_for_date(chat_id, current)
                .await?;
            days.push(DailyStatsResponse {
                date: current,
                user_count,
            });
            current += Duration::days(1);
        }

        Ok(WeekStatsResponse {
            week_start,
            week_end,
            days,
        })
    }
}
