//! 目录管理：banner、slot、social group 的创建

use std::sync::Arc;

use actix_web::{web, Responder, Result as ActixResult};
use tracing::{info, warn};

use crate::api::helpers::{error_from_rotator, success_response};
use crate::api::types::{CreatedId, NewCatalogItem};
use crate::storage::Storage;

/// `/banners` 路由
pub fn banner_routes() -> actix_web::Scope {
    web::scope("/banners").route("", web::post().to(create_banner))
}

/// `/slots` 路由
pub fn slot_routes() -> actix_web::Scope {
    web::scope("/slots").route("", web::post().to(create_slot))
}

/// `/groups` 路由
pub fn group_routes() -> actix_web::Scope {
    web::scope("/groups").route("", web::post().to(create_group))
}

pub async fn create_banner(
    body: web::Json<NewCatalogItem>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    match storage.create_banner(&body.description).await {
        Ok(id) => {
            info!("created banner {}", id);
            Ok(success_response(CreatedId { id }))
        }
        Err(e) => {
            warn!("create banner failed: {}", e);
            Ok(error_from_rotator(&e))
        }
    }
}

pub async fn create_slot(
    body: web::Json<NewCatalogItem>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    match storage.create_slot(&body.description).await {
        Ok(id) => {
            info!("created slot {}", id);
            Ok(success_response(CreatedId { id }))
        }
        Err(e) => {
            warn!("create slot failed: {}", e);
            Ok(error_from_rotator(&e))
        }
    }
}

pub async fn create_group(
    body: web::Json<NewCatalogItem>,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    match storage.create_group(&body.description).await {
        Ok(id) => {
            info!("created social group {}", id);
            Ok(success_response(CreatedId { id }))
        }
        Err(e) => {
            warn!("create group failed: {}", e);
            Ok(error_from_rotator(&e))
        }
    }
}
