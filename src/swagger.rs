use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{PrizeSetType, RoundType};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::checkin::record_checkin,
        handlers::checkin::get_status,
        handlers::lottery::run_weekly,
        handlers::lottery::get_last,
        handlers::prize::get_current,
        handlers::prize::add_item,
        handlers::prize::update_item,
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::stats::get_daily,
        handlers::stats::get_weekly,
    ),
    components(
        schemas(
            RecordCheckinRequest,
            CheckinStatusQuery,
            CheckinStatusResponse,
            RunWeeklyLotteryRequest,
            LastResultQuery,
            LotteryWinnerResponse,
            LotteryResultResponse,
            CurrentPrizesQuery,
            CreatePrizeItemRequest,
            UpdatePrizeItemRequest,
            PrizeItemResponse,
            PrizeSetResponse,
            SettingsQuery,
            UpdateSettingsRequest,
            SettingsResponse,
            DailyStatsQuery,
            WeekStatsQuery,
            DailyStatsResponse,
            WeekStatsResponse,
            RoundType,
            PrizeSetType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "checkin", description = "签到记录与状态"),
        (name = "lottery", description = "周抽奖开奖与结果"),
        (name = "prize", description = "奖池与奖品管理"),
        (name = "settings", description = "群抽奖设置"),
        (name = "stats", description = "签到统计"),
    )
)]
struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
