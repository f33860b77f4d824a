use crate::error::AppError;
use crate::models::*;
use crate::services::{LotteryService, SettingsService};
use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/lottery/weekly/run",
    tag = "lottery",
    request_body = RunWeeklyLotteryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "开奖完成；该周期已开过则原样返回已落库结果", body = LotteryResultResponse),
        (status = 409, description = "无参与者或未配置奖池"),
        (status = 401, description = "未授权")
    )
)]
/// 对上一个完整自然周开奖（手动触发入口）。
/// 幂等：重复调用返回同一份结果，不会重新抽取。
pub async fn run_weekly(
    lottery_service: web::Data<LotteryService>,
    settings_service: web::Data<SettingsService>,
    body: web::Json<RunWeeklyLotteryRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();

    // 暂停状态下不接受手动开奖（与定时任务同一闸门）
    match settings_service.is_weekly_enabled(req.chat_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(AppError::ValidationError(
                "weekly lottery is paused for this chat".into(),
            )
            .error_response());
        }
        Err(e) => return Ok(e.error_response()),
    }

    match lottery_service.run_weekly_lottery(req.chat_id, Utc::now()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/weekly/last",
    tag = "lottery",
    params(
        ("chat_id" = i64, Query, description = "群ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "上一周的开奖结果；未开奖时 data 为 null", body = LotteryResultResponse),
        (status = 401, description = "未授权")
    )
)]
/// 查询上一周的已完成开奖结果（只读回放，不触发开奖）
pub async fn get_last(
    lottery_service: web::Data<LotteryService>,
    query: web::Query<LastResultQuery>,
) -> Result<HttpResponse> {
    match lottery_service
        .get_last_weekly_result(query.chat_id, Utc::now())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lottery")
            .route("/weekly/run", web::post().to(run_weekly))
            .route("/weekly/last", web::get().to(get_last)),
    );
}
