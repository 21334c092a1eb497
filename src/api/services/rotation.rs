//! 轮换管理：选 banner、挂载、摘除

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, Result as ActixResult};
use tracing::{info, trace, warn};

use crate::api::error_code::ErrorCode;
use crate::api::helpers::{error_from_rotator, error_response, success_response};
use crate::api::types::SlotGroupQuery;
use crate::services::BannerSelector;
use crate::storage::{Rotation, Storage};

/// 轮换路由 `/rotation`
///
/// - GET /rotation?slot_id=&group_id= - 选出下一个展示的 banner 并记一次展示
/// - POST /rotation - 把 banner 挂载到 slot
/// - DELETE /rotation - 把 banner 从 slot 摘除
pub fn rotation_routes() -> actix_web::Scope {
    web::scope("/rotation")
        .route("", web::get().to(pick_banner))
        .route("", web::post().to(attach_banner))
        .route("", web::delete().to(detach_banner))
}

pub async fn pick_banner(
    query: web::Query<SlotGroupQuery>,
    selector: web::Data<BannerSelector>,
) -> ActixResult<impl Responder> {
    trace!(
        "picking banner for slot {} / group {}",
        query.slot_id,
        query.group_id
    );

    if let Some(response) = reject_non_positive(&[query.slot_id, query.group_id]) {
        return Ok(response);
    }

    match selector.pick(query.slot_id, query.group_id).await {
        Ok(banner) => Ok(success_response(banner)),
        Err(e) => {
            warn!(
                "pick failed for slot {} / group {}: {}",
                query.slot_id, query.group_id, e
            );
            Ok(error_from_rotator(&e))
        }
    }
}

pub async fn attach_banner(
    body: web::Json<Rotation>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    if let Some(response) = reject_non_positive(&[body.banner_id, body.slot_id]) {
        return Ok(response);
    }

    // 先取当前所有分组，挂载时为每个分组物化零值计数器
    let group_ids = match storage.group_ids().await {
        Ok(ids) => ids,
        Err(e) => return Ok(error_from_rotator(&e)),
    };

    match storage
        .attach_banner_to_slot(body.banner_id, body.slot_id, &group_ids)
        .await
    {
        Ok(()) => {
            info!("banner {} attached to slot {}", body.banner_id, body.slot_id);
            Ok(success_response(()))
        }
        Err(e) => {
            warn!(
                "attach failed for banner {} / slot {}: {}",
                body.banner_id, body.slot_id, e
            );
            Ok(error_from_rotator(&e))
        }
    }
}

pub async fn detach_banner(
    body: web::Json<Rotation>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    if let Some(response) = reject_non_positive(&[body.banner_id, body.slot_id]) {
        return Ok(response);
    }

    match storage
        .detach_banner_from_slot(body.banner_id, body.slot_id)
        .await
    {
        Ok(()) => Ok(success_response(())),
        Err(e) => {
            warn!(
                "detach failed for banner {} / slot {}: {}",
                body.banner_id, body.slot_id, e
            );
            Ok(error_from_rotator(&e))
        }
    }
}

/// ID 必须是正整数
pub(super) fn reject_non_positive(ids: &[i64]) -> Option<HttpResponse> {
    if ids.iter().any(|id| *id <= 0) {
        return Some(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "ids must be positive integers",
        ));
    }
    None
}
