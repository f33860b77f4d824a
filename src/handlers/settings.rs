use crate::models::*;
use crate::services::SettingsService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    params(
        ("chat_id" = i64, Query, description = "群ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "群设置（不存在则创建默认行）", body = SettingsResponse),
        (status = 401, description = "未授权")
    )
)]
/// 查询群设置，首次访问自动建默认行
pub async fn get_settings(
    service: web::Data<SettingsService>,
    query: web::Query<SettingsQuery>,
) -> Result<HttpResponse> {
    match service.get_or_create(query.chat_id).await {
        Ok(model) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": SettingsResponse::from(model)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    request_body = UpdateSettingsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "设置已更新", body = SettingsResponse),
        (status = 400, description = "参数错误"),
        (status = 401, description = "未授权")
    )
)]
/// 更新群设置（开关/开奖时间/全勤系数），缺省字段不变
pub async fn update_settings(
    service: web::Data<SettingsService>,
    body: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    match service.update_settings(&body.into_inner()).await {
        Ok(model) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": SettingsResponse::from(model)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(get_settings))
            .route("", web::put().to(update_settings)),
    );
}
