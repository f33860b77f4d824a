use crate::entities::lottery_settings_entity as settings;
use crate::error::{AppError, AppResult};
use crate::models::UpdateSettingsRequest;
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";
pub const DEFAULT_FULL_ATTENDANCE_FACTOR: i32 = 2;

#[derive(Clone)]
pub struct SettingsService {
    pool: Arc<DatabaseConnection>,
    /// 新建设置行时的默认开奖时间（来自全局配置）
    default_draw_at: NaiveTime,
}

impl SettingsService {
    pub fn new(pool: Arc<DatabaseConnection>, default_draw_at: NaiveTime) -> Self {
        Self {
            pool,
            default_draw_at,
        }
    }

    /// 获取群设置，不存在则创建默认行（并发下依赖唯一键 + DO NOTHING）
    pub async fn get_or_create(&self, chat_id: i64) -> AppResult<settings::Model> {
        if let Some(m) = settings::Entity::find()
            .filter(settings::Column::ChatId.eq(chat_id))
            .one(&*self.pool)
            .await?
        {
            return Ok(m);
        }

        let am = settings::ActiveModel {
            chat_id: Set(chat_id),
            weekly_enabled: Set(true),
            weekly_draw_at: Set(self.default_draw_at),
            full_attendance_factor: Set(DEFAULT_FULL_ATTENDANCE_FACTOR),
            timezone: Set(DEFAULT_TIMEZONE.to_string()),
            ..Default::default()
        };

        match settings::Entity::insert(am)
            .on_conflict(
                OnConflict::column(settings::Column::ChatId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&*self.pool)
            .await
        {
            Ok(_) => {}
            // 另一个调用者刚创建了这行
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        settings::Entity::find()
            .filter(settings::Column::ChatId.eq(chat_id))
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("settings row missing after insert".into()))
    }

    pub async fn is_weekly_enabled(&self, chat_id: i64) -> AppResult<bool> {
        Ok(self.get_or_create(chat_id).await?.weekly_enabled)
    }

    pub async fn set_weekly_enabled(&self, chat_id: i64, enabled: bool) -> AppResult<settings::Model> {
        let model = self.get_or_create(chat_id).await?;
        let mut am = model.into_active_model();
        am.weekly_enabled = Set(enabled);
        am.updated_at = Set(Some(Utc::now()));
        Ok(am.update(&*self.pool).await?)
    }

    /// 按请求更新设置，缺省字段保持不变
    pub async fn update_settings(&self, req: &UpdateSettingsRequest) -> AppResult<settings::Model> {
        if let Some(factor) = req.full_attendance_factor {
            if factor < 1 {
                return Err(AppError::ValidationError(
                    "full_attendance_factor must be >= 1".into(),
                ));
            }
        }

        let model = self.get_or_create(req.chat_id).await?;
        let mut am = model.into_active_model();
        if let Some(enabled) = req.weekly_enabled {
            am.weekly_enabled = Set(enabled);
        }
        if let Some(draw_at) = req.weekly_draw_at {
            am.weekly_draw_at = Set(draw_at);
        }
        if let Some(factor) = req.full_attendance_factor {
            am.full_attendance_factor = Set(factor);
        }
        am.updated_at = Set(Some(Utc::now()));
        Ok(am.update(&*self.pool).await?)
    }
}
