//! Background scheduled tasks for the application.
//!
//! This module centralizes the recurring jobs: the weekly lottery ticker and
//! the check-in retention cleanup. Call `spawn_all` once during startup to
//! launch them.

use crate::config::SchedulerConfig;
use crate::entities::RoundType;
use crate::error::AppError;
use crate::services::{CheckinService, LotteryService, SettingsService};
use crate::utils::time_utils;
use chrono::{Datelike, Duration, Utc, Weekday};

/// Spawn all background tasks.
///
/// Notes
/// - The weekly ticker relies on the engine's idempotency: firing more than
///   once for the same period replays the persisted result.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(
    config: SchedulerConfig,
    lottery_service: LotteryService,
    settings_service: SettingsService,
    checkin_service: CheckinService,
) {
    if !config.enabled {
        log::info!("Scheduler disabled; weekly draws must be triggered manually");
        return;
    }

    // 周一到点后对每个配置的群开奖（每分钟检查一次）
    {
        let chat_ids = config.chat_ids.clone();
        let lottery = lottery_service.clone();
        let settings = settings_service.clone();
        tokio::spawn(async move {
            loop {
                for &chat_id in &chat_ids {
                    if let Err(e) = weekly_tick(chat_id, &lottery, &settings).await {
                        log::error!("Weekly lottery tick failed for chat {chat_id}: {e:?}");
                    }
                }
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            }
        });
    }

    // 过期签到清理（每天一次）
    {
        let chat_ids = config.chat_ids.clone();
        let retention_days = config.checkin_retention_days;
        let svc = checkin_service.clone();
        tokio::spawn(async move {
            loop {
                let cutoff = time_utils::today_beijing(Utc::now()) - Duration::days(retention_days);
                for &chat_id in &chat_ids {
                    match svc.delete_before(chat_id, cutoff).await {
                        Ok(n) if n > 0 => {
                            log::info!("Pruned {n} old check-ins for chat {chat_id}")
                        }
                        Ok(_) => {}
                        Err(e) => log::error!("Failed to prune check-ins for chat {chat_id}: {e:?}"),
                    }
                }
                tokio::time::sleep(std::time::Duration::from_secs(24 * 3600)).await;
            }
        });
    }
}

/// 单个群的一次开奖检查：周一、过了开奖时间、本期还没开过才触发。
/// NoParticipants 是空周的正常情况，降级为 info。
async fn weekly_tick(
    chat_id: i64,
    lottery: &LotteryService,
    settings: &SettingsService,
) -> Result<(), AppError> {
    let now = Utc::now();
    let beijing_now = time_utils::to_beijing(now);
    if beijing_now.weekday() != Weekday::Mon {
        return Ok(());
    }

    let chat_settings = settings.get_or_create(chat_id).await?;
    if !chat_settings.weekly_enabled {
        return Ok(());
    }

    if beijing_now.time() < chat_settings.weekly_draw_at {
        return Ok(());
    }

    let today = time_utils::today_beijing(now);
    let (week_start, week_end) = time_utils::previous_week_start_end(today);
    if lottery
        .is_round_done(chat_id, RoundType::Weekly, week_start, week_end)
        .await?
    {
        return Ok(());
    }

    match lottery.run_weekly_lottery(chat_id, now).await {
        Ok(result) => {
            log::info!(
                "Scheduled weekly lottery completed for chat {chat_id}: round {} with {} winners",
                result.round_id,
                result.winners.len()
            );
            Ok(())
        }
        Err(AppError::NoParticipants) => {
            log::info!("No participants for chat {chat_id} last week; nothing to draw");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

