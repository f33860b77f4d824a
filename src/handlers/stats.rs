use crate::models::*;
use crate::services::StatsService;
use crate::utils::time_utils;
use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/stats/daily",
    tag = "stats",
    params(
        ("chat_id" = i64, Query, description = "群ID"),
        ("date" = Option<String>, Query, description = "统计日期 YYYY-MM-DD，缺省为昨天（北京时区）")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "单日签到人数", body = DailyStatsResponse),
        (status = 401, description = "未授权")
    )
)]
/// 某日签到人数统计
pub async fn get_daily(
    service: web::Data<StatsService>,
    query: web::Query<DailyStatsQuery>,
) -> Result<HttpResponse> {
    let date = query
        .date
        .unwrap_or_else(|| time_utils::yesterday_beijing(Utc::now()));
    match service.get_daily_stats(query.chat_id, date).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/stats/weekly",
    tag = "stats",
    params(
        ("chat_id" = i64, Query, description = "群ID"),
        ("date" = Option<String>, Query, description = "所在周任意一天 YYYY-MM-DD，缺省为今天（北京时区）")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "一周逐日签到人数", body = WeekStatsResponse),
        (status = 401, description = "未授权")
    )
)]
/// 某周逐日签到人数统计
pub async fn get_weekly(
    service: web::Data<StatsService>,
    query: web::Query<WeekStatsQuery>,
) -> Result<HttpResponse> {
    let target = query
        .date
        .unwrap_or_else(|| time_utils::today_beijing(Utc::now()));
    match service.get_week_stats(query.chat_id, target).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": stats }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn stats_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .route("/daily", web::get().to(get_daily))
            .route("/weekly", web::get().to(get_weekly)),
    );
}
