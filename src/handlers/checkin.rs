use crate::models::*;
use crate::services::CheckinService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/checkins",
    tag = "checkin",
    request_body = RecordCheckinRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签到已记录（当天重复签到只刷新消息信息）"),
        (status = 401, description = "未授权")
    )
)]
/// 记录一次签到：接入层把群消息的元数据转发到这里，
/// 签到日按消息时间对应的北京自然日计算
pub async fn record_checkin(
    service: web::Data<CheckinService>,
    body: web::Json<RecordCheckinRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    match service
        .mark_checkin(req.chat_id, req.user_id, req.message_id, req.message_time)
        .await
    {
        Ok(date) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "checkin_date": date }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/checkins/status",
    tag = "checkin",
    params(
        ("chat_id" = i64, Query, description = "群ID"),
        ("user_id" = i64, Query, description = "用户ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取签到状态成功", body = CheckinStatusResponse),
        (status = 401, description = "未授权")
    )
)]
/// 查询用户今天是否已签到及本周签到天数
pub async fn get_status(
    service: web::Data<CheckinService>,
    query: web::Query<CheckinStatusQuery>,
) -> Result<HttpResponse> {
    match service
        .get_checkin_status(query.chat_id, query.user_id, Utc::now())
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": status }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn checkin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/checkins")
            .route("", web::post().to(record_checkin))
            .route("/status", web::get().to(get_status)),
    );
}
