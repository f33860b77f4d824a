use crate::entities::daily_checkin_entity as checkins;
use crate::error::AppResult;
use crate::models::CheckinStatusResponse;
use crate::utils::time_utils;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// 周期内每用户签到天数（group by 聚合行）
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserCheckinCount {
    pub user_id: i64,
    pub checkin_days: i64,
}

#[derive(Clone)]
pub struct CheckinService {
    pool: Arc<DatabaseConnection>,
}

impl CheckinService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 记一次签到：按消息时间的北京自然日入账，当天已有记录则只刷新消息信息
    pub async fn mark_checkin(
        &self,
        chat_id: i64,
        user_id: i64,
        message_id: i64,
        message_time: DateTime<Utc>,
    ) -> AppResult<NaiveDate> {
        let checkin_date = time_utils::today_beijing(message_time);

        let am = checkins::ActiveModel {
            chat_id: Set(chat_id),
            user_id: Set(user_id),
            checkin_date: Set(checkin_date),
            message_id: Set(message_id),
            message_time: Set(message_time),
            ..Default::default()
        };

        checkins::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    checkins::Column::ChatId,
                    checkins::Column::UserId,
                    checkins::Column::CheckinDate,
                ])
                .update_columns([checkins::Column::MessageId, checkins::Column::MessageTime])
                .to_owned(),
            )
            .exec(&*self.pool)
            .await?;

        Ok(checkin_date)
    }

    /// 用户今天是否已签到、本周已签到几天
    pub async fn get_checkin_status(
        &self,
        chat_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<CheckinStatusResponse> {
        let today = time_utils::today_beijing(now);
        let (week_start, week_end) = time_utils::week_start_end(today);

        let today_row = checkins::Entity::find()
            .filter(checkins::Column::ChatId.eq(chat_id))
            .filter(checkins::Column::UserId.eq(user_id))
            .filter(checkins::Column::CheckinDate.eq(today))
            .one(&*self.pool)
            .await?;

        let week_count = checkins::Entity::find()
            .filter(checkins::Column::ChatId.eq(chat_id))
            .filter(checkins::Column::UserId.eq(user_id))
            .filter(checkins::Column::CheckinDate.between(week_start, week_end))
            .count(&*self.pool)
            .await?;

        Ok(CheckinStatusResponse {
            today_checked: today_row.is_some(),
            week_checkin_count: week_count as i64,
            checkin_date: today,
        })
    }

    /// 某日签到人数（唯一键保证一人一天一条，直接计数即可）
    pub async fn count_checkins_for_date(&self, chat_id: i64, date: NaiveDate) -> AppResult<i64> {
        let count = checkins::Entity::find()
            .filter(checkins::Column::ChatId.eq(chat_id))
            .filter(checkins::Column::CheckinDate.eq(date))
            .count(&*self.pool)
            .await?;
        Ok(count as i64)
    }

    /// 周期内全部用户的签到天数聚合，按 user_id 升序（抽取池的固定顺序）
    pub async fn weekly_checkin_counts(
        &self,
        chat_id: i64,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> AppResult<Vec<UserCheckinCount>> {
        let rows = checkins::Entity::find()
            .select_only()
            .column(checkins::Column::UserId)
            .column_as(checkins::Column::Id.count(), "checkin_days")
            .filter(checkins::Column::ChatId.eq(chat_id))
            .filter(checkins::Column::CheckinDate.between(week_start, week_end))
            .group_by(checkins::Column::UserId)
            .order_by_asc(checkins::Column::UserId)
            .into_model::<UserCheckinCount>()
            .all(&*self.pool)
            .await?;
        Ok(rows)
    }

    /// 删除某日期之前的签到记录（保留期清理），返回删除行数
    pub async fn delete_before(&self, chat_id: i64, cutoff_date: NaiveDate) -> AppResult<u64> {
        let res = checkins::Entity::delete_many()
            .filter(checkins::Column::ChatId.eq(chat_id))
            .filter(checkins::Column::CheckinDate.lt(cutoff_date))
            .exec(&*self.pool)
            .await?;
        Ok(res.rows_affected)
    }
}
