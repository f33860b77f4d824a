use crate::models::*;
use crate::services::PrizeService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/prizes/current",
    tag = "prize",
    params(
        ("chat_id" = i64, Query, description = "群ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前周奖池；未配置时 data 为 null", body = PrizeSetResponse),
        (status = 401, description = "未授权")
    )
)]
/// 查看当前周生效的奖池与启用的奖品
pub async fn get_current(
    service: web::Data<PrizeService>,
    query: web::Query<CurrentPrizesQuery>,
) -> Result<HttpResponse> {
    match service.current_set_with_items(query.chat_id, Utc::now()).await {
        Ok(set) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": set }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/prizes/items",
    tag = "prize",
    request_body = CreatePrizeItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "奖品已加入当前周奖池", body = PrizeItemResponse),
        (status = 400, description = "参数错误"),
        (status = 401, description = "未授权")
    )
)]
/// 向当前周奖池添加奖品；奖池不存在时先从历史克隆或新建
pub async fn add_item(
    service: web::Data<PrizeService>,
    body: web::Json<CreatePrizeItemRequest>,
) -> Result<HttpResponse> {
    match service.add_item(&body.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PrizeItemResponse::from(item)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/prizes/items/{id}",
    tag = "prize",
    params(
        ("id" = i64, Path, description = "奖品条目ID")
    ),
    request_body = UpdatePrizeItemRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "奖品启用状态已更新", body = PrizeItemResponse),
        (status = 404, description = "条目不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 启用/停用一个奖品条目（停用的条目不参与开奖，也不再被克隆）
pub async fn update_item(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
    body: web::Json<UpdatePrizeItemRequest>,
) -> Result<HttpResponse> {
    match service
        .set_item_enabled(path.into_inner(), body.enabled)
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": PrizeItemResponse::from(item)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("/current", web::get().to(get_current))
            .route("/items", web::post().to(add_item))
            .route("/items/{id}", web::patch().to(update_item)),
    );
}
