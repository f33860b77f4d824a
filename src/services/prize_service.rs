use crate::entities::{prize_item_entity as items, prize_set_entity as sets, PrizeSetType};
use crate::error::{AppError, AppResult};
use crate::models::{CreatePrizeItemRequest, PrizeSetResponse};
use crate::utils::time_utils;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct PrizeService {
    pool: Arc<DatabaseConnection>,
}

impl PrizeService {
    pub fn new(pool: Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// 完整覆盖 [period_start, period_end] 的奖池（取 valid_from 最新的一套）
    pub async fn get_set_for_period(
        &self,
        chat_id: i64,
        set_type: PrizeSetType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<Option<sets::Model>> {
        let set = sets::Entity::find()
            .filter(sets::Column::ChatId.eq(chat_id))
            .filter(sets::Column::SetType.eq(set_type))
            .filter(sets::Column::ValidFrom.lte(period_start))
            .filter(
                Condition::any()
                    .add(sets::Column::ValidTo.is_null())
                    .add(sets::Column::ValidTo.gte(period_end)),
            )
            .order_by_desc(sets::Column::ValidFrom)
            .order_by_desc(sets::Column::Id)
            .one(&*self.pool)
            .await?;
        Ok(set)
    }

    /// 最近一套 valid_from <= ref_date 的奖池（不管 valid_to），克隆的来源
    pub async fn get_latest_set_before(
        &self,
        chat_id: i64,
        set_type: PrizeSetType,
        ref_date: NaiveDate,
    ) -> AppResult<Option<sets::Model>> {
        let set = sets::Entity::find()
            .filter(sets::Column::ChatId.eq(chat_id))
            .filter(sets::Column::SetType.eq(set_type))
            .filter(sets::Column::ValidFrom.lte(ref_date))
            .order_by_desc(sets::Column::ValidFrom)
            .order_by_desc(sets::Column::Id)
            .one(&*self.pool)
            .await?;
        Ok(set)
    }

    /// 奖池内启用的条目，名次升序（NULL 名次排最后），同名次按入库顺序
    pub async fn enabled_items(&self, set_id: i64) -> AppResult<Vec<items::Model>> {
        let rows = items::Entity::find()
            .filter(items::Column::SetId.eq(set_id))
            .filter(items::Column::Enabled.eq(true))
            .order_by_asc(items::Column::PrizeRank)
            .order_by_asc(items::Column::Id)
            .all(&*self.pool)
            .await?;
        Ok(rows)
    }

    /// 解析某周期应使用的奖池：
    /// 1. 已有完整覆盖的奖池 -> 原样返回（管理员已配置的路径）
    /// 2. 否则从最近一套克隆一份新奖池限定到该周期（沿用上周奖品）
    /// 3. 都没有 -> NoPrizeSetConfigured
    pub async fn resolve_set_for_period(
        &self,
        chat_id: i64,
        set_type: PrizeSetType,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<sets::Model> {
        if let Some(set) = self
            .get_set_for_period(chat_id, set_type, period_start, period_end)
            .await?
        {
            return Ok(set);
        }

        let source = self
            .get_latest_set_before(chat_id, set_type, period_start)
            .await?
            .ok_or(AppError::NoPrizeSetConfigured)?;

        self.clone_set_for_period(&source, period_start, period_end)
            .await
    }

    /// 确保某周期有奖池（开奖后的预置克隆）。来源可指定（本轮用的奖池），
    /// 否则取最近一套；没有任何来源时返回 None 而不是报错。
    pub async fn ensure_set_for_period(
        &self,
        chat_id: i64,
        set_type: PrizeSetType,
        period_start: NaiveDate,
        period_end: NaiveDate,
        fallback_source: Option<&sets::Model>,
    ) -> AppResult<Option<i64>> {
        if let Some(existing) = self
            .get_set_for_period(chat_id, set_type, period_start, period_end)
            .await?
        {
            return Ok(Some(existing.id));
        }

        let source = match fallback_source {
            Some(s) => Some(s.clone()),
            None => {
                self.get_latest_set_before(chat_id, set_type, period_start)
                    .await?
            }
        };
        let Some(source) = source else {
            return Ok(None);
        };

        let cloned = self
            .clone_set_for_period(&source, period_start, period_end)
            .await?;
        Ok(Some(cloned.id))
    }

    /// 当前周的奖池与条目（管理查看）
    pub async fn current_set_with_items(
        &self,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PrizeSetResponse>> {
        let today = time_utils::today_beijing(now);
        let (week_start, week_end) = time_utils::week_start_end(today);
        let Some(set) = self
            .get_set_for_period(chat_id, PrizeSetType::Weekly, week_start, week_end)
            .await?
        else {
            return Ok(None);
        };
        let item_rows = self.enabled_items(set.id).await?;
        Ok(Some(PrizeSetResponse::from_set(set, item_rows)))
    }

    /// 向当前周奖池加一个奖品；奖池缺失时先克隆历史奖池，连历史都没有则
    /// 为该周新建空奖池再插入（首个奖品的配置入口）
    pub async fn add_item(&self, req: &CreatePrizeItemRequest) -> AppResult<items::Model> {
        let quantity = req.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(AppError::ValidationError("quantity must be >= 1".into()));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::ValidationError("name must not be empty".into()));
        }

        let today = time_utils::today_beijing(Utc::now());
        let (week_start, week_end) = time_utils::week_start_end(today);

        let set = match self
            .ensure_set_for_period(req.chat_id, PrizeSetType::Weekly, week_start, week_end, None)
            .await?
        {
            Some(set_id) => sets::Entity::find_by_id(set_id)
                .one(&*self.pool)
                .await?
                .ok_or_else(|| AppError::InternalError("prize set vanished".into()))?,
            None => {
                // 该群第一次配置奖品
                sets::ActiveModel {
                    chat_id: Set(req.chat_id),
                    set_type: Set(PrizeSetType::Weekly),
                    valid_from: Set(week_start),
                    valid_to: Set(Some(week_end)),
                    ..Default::default()
                }
                .insert(&*self.pool)
                .await?
            }
        };

        let prize_rank = match req.prize_rank {
            Some(r) => Some(r),
            None => {
                // 缺省排到当前最后
                let existing = self.enabled_items(set.id).await?;
                let max_rank = existing.iter().filter_map(|i| i.prize_rank).max();
                Some(max_rank.unwrap_or(existing.len() as i32) + 1)
            }
        };

        let item = items::ActiveModel {
            set_id: Set(set.id),
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            quantity: Set(quantity),
            enabled: Set(true),
            prize_rank: Set(prize_rank),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(item)
    }

    pub async fn set_item_enabled(&self, item_id: i64, enabled: bool) -> AppResult<items::Model> {
        let item = items::Entity::find_by_id(item_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("prize item {item_id} not found")))?;
        let mut am = item.into_active_model();
        am.enabled = Set(enabled);
        Ok(am.update(&*self.pool).await?)
    }

    /// 克隆奖池到新周期：只复制启用的条目，名次保留；来源名次缺失的按
    /// 原顺序从 1 起补齐
    async fn clone_set_for_period(
        &self,
        source: &sets::Model,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<sets::Model> {
        let source_items = self.enabled_items(source.id).await?;

        let txn = self.pool.begin().await?;

        let new_set = sets::ActiveModel {
            chat_id: Set(source.chat_id),
            set_type: Set(source.set_type),
            valid_from: Set(period_start),
            valid_to: Set(Some(period_end)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (idx, item) in source_items.iter().enumerate() {
            items::ActiveModel {
                set_id: Set(new_set.id),
                name: Set(item.name.clone()),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                enabled: Set(item.enabled),
                prize_rank: Set(Some(item.prize_rank.unwrap_or(idx as i32 + 1))),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        log::info!(
            "Cloned prize set {} -> {} for chat {} period {} ~ {}",
            source.id,
            new_set.id,
            new_set.chat_id,
            period_start,
            period_end
        );

        Ok(new_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    /// 克隆时名次补齐规则：有名次的保留，缺失的按原顺序补 1..n
    #[test]
    fn test_clone_rank_fallback() {
        let source_ranks: Vec<Option<i32>> = vec![Some(1), None, Some(5), None];
        let cloned: Vec<i32> = source_ranks
            .iter()
            .enumerate()
            .map(|(idx, r)| r.unwrap_or(idx as i32 + 1))
            .collect();
        assert_eq!(cloned, vec![1, 2, 5, 4]);
    }

    fn source_set() -> sets::Model {
        sets::Model {
            id: 3,
            chat_id: 1,
            set_type: PrizeSetType::Weekly,
            valid_from: NaiveDate::from_ymd_opt(2025, 9, 29).unwrap(),
            valid_to: Some(NaiveDate::from_ymd_opt(2025, 10, 5).unwrap()),
            created_at: None,
        }
    }

    fn gift_item(set_id: i64) -> items::Model {
        items::Model {
            id: 7,
            set_id,
            name: "Gift".to_string(),
            description: None,
            quantity: 2,
            enabled: true,
            prize_rank: Some(1),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_clones_latest_set_when_period_uncovered() {
        let new_set = sets::Model {
            id: 4,
            chat_id: 1,
            set_type: PrizeSetType::Weekly,
            valid_from: NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
            valid_to: Some(NaiveDate::from_ymd_opt(2025, 10, 12).unwrap()),
            created_at: None,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // 目标周期无覆盖奖池
            .append_query_results([Vec::<sets::Model>::new()])
            // 最近一套可作为克隆来源
            .append_query_results([vec![source_set()]])
            // 来源条目
            .append_query_results([vec![gift_item(3)]])
            // 新奖池与克隆条目的 INSERT .. RETURNING
            .append_query_results([vec![new_set.clone()]])
            .append_query_results([vec![gift_item(4)]])
            .into_connection();

        let service = PrizeService::new(Arc::new(db));
        let resolved = service
            .resolve_set_for_period(
                1,
                PrizeSetType::Weekly,
                NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 12).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resolved.id, 4);
        assert_eq!(resolved.valid_from, new_set.valid_from);
        assert_eq!(resolved.valid_to, new_set.valid_to);
    }

    #[tokio::test]
    async fn test_resolve_fails_without_any_set() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sets::Model>::new()])
            .append_query_results([Vec::<sets::Model>::new()])
            .into_connection();

        let service = PrizeService::new(Arc::new(db));
        let err = service
            .resolve_set_for_period(
                1,
                PrizeSetType::Weekly,
                NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 12).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoPrizeSetConfigured));
    }
}
