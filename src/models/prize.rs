use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{prize_item_entity as items, prize_set_entity as sets, PrizeSetType};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CurrentPrizesQuery {
    pub chat_id: i64,
}

/// 新增奖品条目（加入当前周奖池，奖池缺失时先克隆/创建）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePrizeItemRequest {
    pub chat_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 名额数，默认 1
    pub quantity: Option<i32>,
    /// 名次，缺省排到当前最后
    pub prize_rank: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdatePrizeItemRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeItemResponse {
    pub id: i64,
    pub set_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub enabled: bool,
    pub prize_rank: i32,
}

impl From<items::Model> for PrizeItemResponse {
    fn from(m: items::Model) -> Self {
        PrizeItemResponse {
            id: m.id,
            set_id: m.set_id,
            name: m.name,
            description: m.description,
            quantity: m.quantity,
            enabled: m.enabled,
            prize_rank: m.prize_rank.unwrap_or(0),
        }
    }
}

/// 奖池及其条目
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeSetResponse {
    pub id: i64,
    pub chat_id: i64,
    pub set_type: PrizeSetType,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub items: Vec<PrizeItemResponse>,
}

impl PrizeSetResponse {
    pub fn from_set(set: sets::Model, item_rows: Vec<items::Model>) -> Self {
        PrizeSetResponse {
            id: set.id,
            chat_id: set.chat_id,
            set_type: set.set_type,
            valid_from: set.valid_from,
            valid_to: set.valid_to,
            items: item_rows.into_iter().map(Into::into).collect(),
        }
    }
}
