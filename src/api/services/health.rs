//! 健康检查

use std::sync::Arc;

use actix_web::{web, Responder, Result as ActixResult};

use crate::api::helpers::success_response;
use crate::api::types::HealthStatus;
use crate::services::AppStartTime;
use crate::storage::Storage;

/// `/health` 路由
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health").route("", web::get().to(health_check))
}

pub async fn health_check(
    storage: web::Data<Arc<dyn Storage>>,
    start_time: web::Data<AppStartTime>,
) -> ActixResult<impl Responder> {
    let uptime = chrono::Utc::now() - start_time.start_datetime;

    Ok(success_response(HealthStatus {
        status: "ok".to_string(),
        backend: storage.get_backend_name().await,
        uptime_seconds: uptime.num_seconds(),
    }))
}
