use crate::entities::{
    lottery_round_entity as rounds, lottery_round_entry_entity as entries,
    lottery_winner_entity as winners, PrizeSetType, RoundStatus, RoundType,
};
use crate::error::{AppError, AppResult};
use crate::models::LotteryResultResponse;
use crate::services::{CheckinService, PrizeService, SettingsService, UserCheckinCount};
use crate::utils::time_utils;
use crate::utils::weighted_draw::{draw_winners, DrawEntry, DrawPrize, RandomSource, ThreadRngSource};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex as AsyncMutex;

type RoundKey = (i64, RoundType, NaiveDate);

/// 每个 (chat_id, round_type, period_start) 一把异步锁。
/// 定时任务与手动触发可能同时进来，不串行的话两边都会通过"轮次不存在"
/// 检查并各抽一次奖。
#[derive(Clone, Default)]
struct RoundLocks {
    inner: Arc<StdMutex<HashMap<RoundKey, Arc<AsyncMutex<()>>>>>,
}

impl RoundLocks {
    fn lock_for(&self, key: RoundKey) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock().expect("round lock map poisoned");
        map.entry(key).or_default().clone()
    }
}

#[derive(Clone)]
pub struct LotteryService {
    pool: Arc<DatabaseConnection>,
    checkin_service: CheckinService,
    settings_service: SettingsService,
    prize_service: PrizeService,
    locks: RoundLocks,
    rng: Arc<StdMutex<Box<dyn RandomSource>>>,
}

impl LotteryService {
    pub fn new(
        pool: Arc<DatabaseConnection>,
        checkin_service: CheckinService,
        settings_service: SettingsService,
        prize_service: PrizeService,
    ) -> Self {
        Self::with_random_source(
            pool,
            checkin_service,
            settings_service,
            prize_service,
            Box::new(ThreadRngSource),
        )
    }

    /// 注入随机源（测试用固定种子复现抽取序列）
    pub fn with_random_source(
        pool: Arc<DatabaseConnection>,
        checkin_service: CheckinService,
        settings_service: SettingsService,
        prize_service: PrizeService,
        random_source: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            pool,
            checkin_service,
            settings_service,
            prize_service,
            locks: RoundLocks::default(),
            rng: Arc::new(StdMutex::new(random_source)),
        }
    }

    /// 对上一个完整自然周开一轮周抽奖。
    ///
    /// 幂等：该周期已有 done 轮次时原样返回落库结果，不触发任何随机数；
    /// 崩溃残留的 running 轮次会被复用而不是重建。
    pub async fn run_weekly_lottery(
        &self,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<LotteryResultResponse> {
        let today = time_utils::today_beijing(now);
        let (week_start, week_end) = time_utils::previous_week_start_end(today);
        self.run_round(chat_id, RoundType::Weekly, week_start, week_end)
            .await
    }

    /// 上一周的已完成结果（未开奖返回 None，只读不触发开奖）
    pub async fn get_last_weekly_result(
        &self,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<LotteryResultResponse>> {
        let today = time_utils::today_beijing(now);
        let (week_start, week_end) = time_utils::previous_week_start_end(today);

        let Some(round) = self
            .get_round(chat_id, RoundType::Weekly, week_start, week_end)
            .await?
        else {
            return Ok(None);
        };
        if !round.is_done() {
            return Ok(None);
        }

        let winner_rows = self.get_winners(round.id).await?;
        Ok(Some(LotteryResultResponse::from_round(round, winner_rows)))
    }

    /// 该周期的轮次是否已完成（定时任务用来避免重复触发）
    pub async fn is_round_done(
        &self,
        chat_id: i64,
        round_type: RoundType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<bool> {
        let round = self
            .get_round(chat_id, round_type, period_start, period_end)
            .await?;
        Ok(round.map(|r| r.is_done()).unwrap_or(false))
    }

    async fn run_round(
        &self,
        chat_id: i64,
        round_type: RoundType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<LotteryResultResponse> {
        let lock = self.locks.lock_for((chat_id, round_type, period_start));
        let _guard = lock.lock().await;

        // 已完成 -> 直接回放落库结果
        let existing = self
            .get_round(chat_id, round_type, period_start, period_end)
            .await?;
        if let Some(round) = &existing {
            if round.is_done() {
                let winner_rows = self.get_winners(round.id).await?;
                return Ok(LotteryResultResponse::from_round(
                    round.clone(),
                    winner_rows,
                ));
            }
        }

        let settings = self.settings_service.get_or_create(chat_id).await?;

        let counts = self
            .checkin_service
            .weekly_checkin_counts(chat_id, period_start, period_end)
            .await?;
        if counts.is_empty() {
            return Err(AppError::NoParticipants);
        }

        let period_days = (period_end - period_start).num_days() + 1;
        let (draw_entries, total_weight) = build_entries(
            &counts,
            settings.full_attendance_factor as i64,
            period_days,
        );

        let prize_set = self
            .prize_service
            .resolve_set_for_period(
                chat_id,
                prize_set_type_for(round_type),
                period_start,
                period_end,
            )
            .await?;
        let items = self.prize_service.enabled_items(prize_set.id).await?;
        let draw_prizes: Vec<DrawPrize> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| DrawPrize {
                name: item.name.clone(),
                description: item.description.clone(),
                quantity: item.quantity,
                prize_rank: item.prize_rank.unwrap_or(idx as i32 + 1),
            })
            .collect();

        // 轮次行：重试时复用残留的 running 行
        let round = match existing {
            Some(r) => r,
            None => {
                rounds::ActiveModel {
                    chat_id: Set(chat_id),
                    round_type: Set(round_type),
                    period_start_date: Set(period_start),
                    period_end_date: Set(period_end),
                    status: Set(RoundStatus::Running),
                    prize_set_id: Set(Some(prize_set.id)),
                    ..Default::default()
                }
                .insert(&*self.pool)
                .await?
            }
        };

        let drawn = {
            let mut rng = self.rng.lock().expect("random source lock poisoned");
            draw_winners(&draw_entries, &draw_prizes, rng.as_mut())
        };

        // 持久化顺序不可调换：参与 -> 中奖 -> done。
        // 中途崩溃只会留下 running 轮次，下次重试从头再来。
        self.add_entries(round.id, chat_id, &draw_entries).await?;
        self.add_winners(round.id, chat_id, prize_set.id, &drawn)
            .await?;
        let done = self
            .complete_round(round, draw_entries.len() as i32, total_weight)
            .await?;

        log::info!(
            "Weekly lottery done for chat {} period {} ~ {}: {} participants, {} winners",
            chat_id,
            period_start,
            period_end,
            done.total_participants.unwrap_or(0),
            drawn.len()
        );

        // 预置下一周期奖池；失败不影响本轮结果，下轮解析时还有机会克隆
        let next_start = period_end + Duration::days(1);
        let next_end = next_start + Duration::days(6);
        if let Err(e) = self
            .prize_service
            .ensure_set_for_period(
                chat_id,
                prize_set.set_type,
                next_start,
                next_end,
                Some(&prize_set),
            )
            .await
        {
            log::warn!("Failed to prepare next period prize set for chat {chat_id}: {e:?}");
        }

        let winner_rows = self.get_winners(done.id).await?;
        Ok(LotteryResultResponse::from_round(done, winner_rows))
    }

    // -----------------------------
    // 内部存取辅助
    // -----------------------------

    async fn get_round(
        &self,
        chat_id: i64,
        round_type: RoundType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<Option<rounds::Model>> {
        let round = rounds::Entity::find()
            .filter(rounds::Column::ChatId.eq(chat_id))
            .filter(rounds::Column::RoundType.eq(round_type))
            .filter(rounds::Column::PeriodStartDate.eq(period_start))
            .filter(rounds::Column::PeriodEndDate.eq(period_end))
            .one(&*self.pool)
            .await?;
        Ok(round)
    }

    async fn get_winners(&self, round_id: i64) -> AppResult<Vec<winners::Model>> {
        let rows = winners::Entity::find()
            .filter(winners::Column::RoundId.eq(round_id))
            .order_by_asc(winners::Column::PrizeRank)
            .order_by_asc(winners::Column::Id)
            .all(&*self.pool)
            .await?;
        Ok(rows)
    }

    async fn add_entries(
        &self,
        round_id: i64,
        chat_id: i64,
        draw_entries: &[DrawEntry],
    ) -> AppResult<()> {
        let models: Vec<entries::ActiveModel> = draw_entries
            .iter()
            .map(|e| entries::ActiveModel {
                round_id: Set(round_id),
                chat_id: Set(chat_id),
                user_id: Set(e.user_id),
                checkin_days: Set(e.checkin_days),
                weight: Set(e.weight),
                is_full_attendance: Set(e.is_full_attendance),
                ..Default::default()
            })
            .collect();

        // 重试覆盖残留行而不是撞唯一键
        entries::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([entries::Column::RoundId, entries::Column::UserId])
                    .update_columns([
                        entries::Column::CheckinDays,
                        entries::Column::Weight,
                        entries::Column::IsFullAttendance,
                    ])
                    .to_owned(),
            )
            .exec(&*self.pool)
            .await?;
        Ok(())
    }

    async fn add_winners(
        &self,
        round_id: i64,
        chat_id: i64,
        prize_set_id: i64,
        drawn: &[crate::utils::weighted_draw::DrawnWinner],
    ) -> AppResult<()> {
        if drawn.is_empty() {
            return Ok(());
        }

        let models: Vec<winners::ActiveModel> = drawn
            .iter()
            .map(|w| winners::ActiveModel {
                round_id: Set(round_id),
                chat_id: Set(chat_id),
                user_id: Set(w.user_id),
                prize_set_id: Set(Some(prize_set_id)),
                prize_name: Set(w.prize_name.clone()),
                prize_description: Set(w.prize_description.clone()),
                prize_rank: Set(w.prize_rank),
                ..Default::default()
            })
            .collect();

        winners::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([winners::Column::RoundId, winners::Column::UserId])
                    .update_columns([
                        winners::Column::PrizeName,
                        winners::Column::PrizeDescription,
                        winners::Column::PrizeRank,
                    ])
                    .to_owned(),
            )
            .exec(&*self.pool)
            .await?;
        Ok(())
    }

    /// 标记完成并写入统计；这是唯一把状态翻成 done 的地方
    async fn complete_round(
        &self,
        round: rounds::Model,
        total_participants: i32,
        total_weight: i64,
    ) -> AppResult<rounds::Model> {
        let mut am = round.into_active_model();
        am.status = Set(RoundStatus::Done);
        am.total_participants = Set(Some(total_participants));
        am.total_weight = Set(Some(total_weight));
        am.completed_at = Set(Some(Utc::now()));
        Ok(am.update(&*self.pool).await?)
    }
}

fn prize_set_type_for(round_type: RoundType) -> PrizeSetType {
    match round_type {
        RoundType::Weekly => PrizeSetType::Weekly,
    }
}

/// 权重计算：weight = 签到天数 ×（全勤则乘系数），天数为 0 的只记录不参抽。
/// 输入已按 user_id 升序，抽取池沿用这个顺序。
fn build_entries(
    counts: &[UserCheckinCount],
    full_attendance_factor: i64,
    period_days: i64,
) -> (Vec<DrawEntry>, i64) {
    let mut total_weight = 0i64;
    let entries: Vec<DrawEntry> = counts
        .iter()
        .map(|c| {
            let is_full = c.checkin_days == period_days;
            let weight = c.checkin_days * if is_full { full_attendance_factor } else { 1 };
            total_weight += weight;
            DrawEntry {
                user_id: c.user_id,
                checkin_days: c.checkin_days as i32,
                weight,
                is_full_attendance: is_full,
            }
        })
        .collect();
    (entries, total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::lottery_settings_entity as settings;
    use chrono::{NaiveTime, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    /// 回放路径禁止触发随机数
    struct PanicSource;

    impl RandomSource for PanicSource {
        fn next_in(&mut self, _upper: i64) -> i64 {
            panic!("replay of a completed round must not draw");
        }
    }

    fn service_over(pool: DatabaseConnection, source: Box<dyn RandomSource>) -> LotteryService {
        let pool = Arc::new(pool);
        LotteryService::with_random_source(
            pool.clone(),
            CheckinService::new(pool.clone()),
            SettingsService::new(pool.clone(), NaiveTime::MIN),
            PrizeService::new(pool),
            source,
        )
    }

    fn count(user_id: i64, checkin_days: i64) -> UserCheckinCount {
        UserCheckinCount {
            user_id,
            checkin_days,
        }
    }

    #[test]
    fn test_full_attendance_weighting() {
        let counts = vec![count(1, 7), count(2, 3), count(3, 0)];
        let (entries, total) = build_entries(&counts, 2, 7);

        assert_eq!(entries[0].weight, 14);
        assert!(entries[0].is_full_attendance);
        assert_eq!(entries[1].weight, 3);
        assert!(!entries[1].is_full_attendance);
        assert_eq!(entries[2].weight, 0);
        assert_eq!(total, 17);
    }

    #[test]
    fn test_factor_one_means_no_bonus() {
        let counts = vec![count(1, 7)];
        let (entries, total) = build_entries(&counts, 1, 7);
        assert_eq!(entries[0].weight, 7);
        assert_eq!(total, 7);
    }

    fn done_round() -> rounds::Model {
        rounds::Model {
            id: 10,
            chat_id: 1,
            round_type: RoundType::Weekly,
            period_start_date: NaiveDate::from_ymd_opt(2025, 9, 29).unwrap(),
            period_end_date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            status: RoundStatus::Done,
            total_participants: Some(2),
            total_weight: Some(17),
            prize_set_id: Some(3),
            created_at: None,
            completed_at: None,
        }
    }

    fn persisted_winner() -> winners::Model {
        winners::Model {
            id: 1,
            round_id: 10,
            chat_id: 1,
            user_id: 42,
            prize_set_id: Some(3),
            prize_name: "Gift".to_string(),
            prize_description: None,
            prize_rank: 1,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_replay_done_round_without_redraw() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![done_round()]])
            .append_query_results([vec![persisted_winner()]])
            .into_connection();

        let service = service_over(db, Box::new(PanicSource));

        // 2025-10-08（周三）回溯的上一周 = 09-29 ~ 10-05
        let now = Utc.with_ymd_and_hms(2025, 10, 8, 4, 0, 0).unwrap();
        let result = service.run_weekly_lottery(1, now).await.unwrap();

        assert_eq!(result.round_id, 10);
        assert_eq!(result.total_participants, 2);
        assert_eq!(result.total_weight, 17);
        assert_eq!(result.winners.len(), 1);
        assert_eq!(result.winners[0].user_id, 42);
        assert_eq!(result.winners[0].prize_name, "Gift");
    }

    #[tokio::test]
    async fn test_empty_aggregate_is_no_participants() {
        let settings_row = settings::Model {
            id: 1,
            chat_id: 1,
            weekly_enabled: true,
            weekly_draw_at: NaiveTime::MIN,
            full_attendance_factor: 2,
            timezone: "Asia/Shanghai".to_string(),
            created_at: None,
            updated_at: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // 该周期没有轮次
            .append_query_results([Vec::<rounds::Model>::new()])
            // 设置行已存在
            .append_query_results([vec![settings_row]])
            // 签到聚合为空
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let service = service_over(db, Box::new(PanicSource));

        let now = Utc.with_ymd_and_hms(2025, 10, 8, 4, 0, 0).unwrap();
        let err = service.run_weekly_lottery(1, now).await.unwrap_err();
        assert!(matches!(err, AppError::NoParticipants));
    }

    #[tokio::test]
    async fn test_last_result_none_when_undrawn() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<rounds::Model>::new()])
            .into_connection();

        let service = service_over(db, Box::new(PanicSource));

        let now = Utc.with_ymd_and_hms(2025, 10, 8, 4, 0, 0).unwrap();
        let result = service.get_last_weekly_result(1, now).await.unwrap();
        assert!(result.is_none());
    }
}
