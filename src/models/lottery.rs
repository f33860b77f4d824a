use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{lottery_round_entity as rounds, lottery_winner_entity as winners, RoundType};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RunWeeklyLotteryRequest {
    pub chat_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LastResultQuery {
    pub chat_id: i64,
}

/// 单个中奖者
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LotteryWinnerResponse {
    pub user_id: i64,
    pub prize_name: String,
    pub prize_description: Option<String>,
    pub prize_rank: i32,
}

impl From<winners::Model> for LotteryWinnerResponse {
    fn from(m: winners::Model) -> Self {
        LotteryWinnerResponse {
            user_id: m.user_id,
            prize_name: m.prize_name,
            prize_description: m.prize_description,
            prize_rank: m.prize_rank,
        }
    }
}

/// 一轮开奖的最终结果（落库后的不可变视图）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LotteryResultResponse {
    pub round_id: i64,
    pub round_type: RoundType,
    pub period_start_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub total_participants: i32,
    pub total_weight: i64,
    pub winners: Vec<LotteryWinnerResponse>,
}

impl LotteryResultResponse {
    /// 由已完成轮次与其中奖记录组装结果，不做任何计算
    pub fn from_round(round: rounds::Model, winner_rows: Vec<winners::Model>) -> Self {
        LotteryResultResponse {
            round_id: round.id,
            round_type: round.round_type,
            period_start_date: round.period_start_date,
            period_end_date: round.period_end_date,
            total_participants: round.total_participants.unwrap_or(0),
            total_weight: round.total_weight.unwrap_or(0),
            winners: winner_rows.into_iter().map(Into::into).collect(),
        }
    }
}
