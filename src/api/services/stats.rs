//! 统计：点击回传和计数器读取

use std::sync::Arc;

use actix_web::{web, Responder, Result as ActixResult};
use tracing::{trace, warn};

use crate::api::helpers::{error_from_rotator, success_response};
use crate::api::types::{ClickBody, SlotGroupQuery};
use crate::services::BannerSelector;
use crate::storage::Storage;

use super::rotation::reject_non_positive;

/// `/clicks` 路由
pub fn click_routes() -> actix_web::Scope {
    web::scope("/clicks").route("", web::post().to(record_click))
}

/// `/stats` 路由
pub fn stats_routes() -> actix_web::Scope {
    web::scope("/stats").route("", web::get().to(get_stats))
}

pub async fn record_click(
    body: web::Json<ClickBody>,
    selector: web::Data<BannerSelector>,
) -> ActixResult<impl Responder> {
    if let Some(response) = reject_non_positive(&[body.banner_id, body.slot_id, body.group_id]) {
        return Ok(response);
    }

    match selector
        .record_click(body.banner_id, body.slot_id, body.group_id)
        .await
    {
        Ok(()) => Ok(success_response(())),
        Err(e) => {
            warn!(
                "click record failed for banner {} / slot {} / group {}: {}",
                body.banner_id, body.slot_id, body.group_id, e
            );
            Ok(error_from_rotator(&e))
        }
    }
}

/// 某 (slot, group) 下所有在轮换中的 banner 的计数器
pub async fn get_stats(
    query: web::Query<SlotGroupQuery>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    trace!(
        "reading stats for slot {} / group {}",
        query.slot_id,
        query.group_id
    );

    if let Some(response) = reject_non_positive(&[query.slot_id, query.group_id]) {
        return Ok(response);
    }

    let banner_ids = match storage.banners_for_slot(query.slot_id).await {
        Ok(ids) => ids,
        Err(e) => return Ok(error_from_rotator(&e)),
    };

    match storage
        .get_counters(query.slot_id, query.group_id, &banner_ids)
        .await
    {
        Ok(counters) => Ok(success_response(counters)),
        Err(e) => Ok(error_from_rotator(&e)),
    }
}
