//! HTTP API integration tests
//!
//! Full request/response flows over the in-memory backend.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use serde_json::json;

use banner_rotator::api::services::{catalog, health, rotation, stats};
use banner_rotator::api::types::{ApiResponse, CreatedId};
use banner_rotator::services::{AppStartTime, BannerSelector};
use banner_rotator::storage::{Banner, Counter, MemoryStorage, Storage};

macro_rules! test_app {
    ($storage:expr) => {{
        let storage: Arc<dyn Storage> = $storage;
        let selector = web::Data::new(BannerSelector::new(storage.clone()));
        test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(selector)
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .service(rotation::rotation_routes())
                .service(catalog::banner_routes())
                .service(catalog::slot_routes())
                .service(catalog::group_routes())
                .service(stats::click_routes())
                .service(stats::stats_routes())
                .service(health::health_routes()),
        )
        .await
    }};
}

macro_rules! create_item {
    ($app:expr, $path:expr, $description:expr) => {{
        let req = TestRequest::post()
            .uri($path)
            .set_json(json!({ "description": $description }))
            .to_request();
        let body: ApiResponse<CreatedId> = test::call_and_read_body_json(&$app, req).await;
        assert_eq!(body.code, 0);
        body.data.expect("created id missing").id
    }};
}

#[actix_rt::test]
async fn full_rotation_flow() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let slot_id = create_item!(app, "/slots", "front page");
    let group_id = create_item!(app, "/groups", "students");
    let first_banner = create_item!(app, "/banners", "spring sale");
    let second_banner = create_item!(app, "/banners", "summer sale");

    for banner_id in [first_banner, second_banner] {
        let req = TestRequest::post()
            .uri("/rotation")
            .set_json(json!({ "banner_id": banner_id, "slot_id": slot_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // 冷启动：第一个被选中的一定是还没展示过的
    let req = TestRequest::get()
        .uri(&format!(
            "/rotation?slot_id={}&group_id={}",
            slot_id, group_id
        ))
        .to_request();
    let body: ApiResponse<Banner> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.code, 0);
    let picked = body.data.expect("banner missing");
    assert_eq!(picked.id, first_banner);

    let req = TestRequest::post()
        .uri("/clicks")
        .set_json(json!({
            "banner_id": picked.id,
            "slot_id": slot_id,
            "group_id": group_id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/stats?slot_id={}&group_id={}", slot_id, group_id))
        .to_request();
    let body: ApiResponse<Vec<Counter>> = test::call_and_read_body_json(&app, req).await;
    let counters = body.data.expect("counters missing");
    assert_eq!(counters.len(), 2);

    let picked_counter = counters.iter().find(|c| c.banner_id == picked.id).unwrap();
    assert_eq!(picked_counter.shows, 1);
    assert_eq!(picked_counter.clicks, 1);
}

#[actix_rt::test]
async fn pick_from_empty_slot_is_404_no_candidates() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let slot_id = create_item!(app, "/slots", "empty slot");
    let group_id = create_item!(app, "/groups", "students");

    let req = TestRequest::get()
        .uri(&format!(
            "/rotation?slot_id={}&group_id={}",
            slot_id, group_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 3000);
}

#[actix_rt::test]
async fn non_positive_ids_are_rejected() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let req = TestRequest::get()
        .uri("/rotation?slot_id=0&group_id=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/rotation")
        .set_json(json!({ "banner_id": -3, "slot_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn click_for_unknown_counter_is_404() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let req = TestRequest::post()
        .uri("/clicks")
        .set_json(json!({ "banner_id": 1, "slot_id": 1, "group_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn detach_stops_future_picks() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let slot_id = create_item!(app, "/slots", "front page");
    let group_id = create_item!(app, "/groups", "students");
    let banner_id = create_item!(app, "/banners", "short lived");

    let req = TestRequest::post()
        .uri("/rotation")
        .set_json(json!({ "banner_id": banner_id, "slot_id": slot_id }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::OK
    );

    let req = TestRequest::delete()
        .uri("/rotation")
        .set_json(json!({ "banner_id": banner_id, "slot_id": slot_id }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::OK
    );

    let req = TestRequest::get()
        .uri(&format!(
            "/rotation?slot_id={}&group_id={}",
            slot_id, group_id
        ))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn health_reports_backend() {
    let app = test_app!(Arc::new(MemoryStorage::new()));

    let req = TestRequest::get().uri("/health").to_request();
    let body: ApiResponse<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.code, 0);
    let data = body.data.expect("health data missing");
    assert_eq!(data["status"], "ok");
    assert_eq!(data["backend"], "memory");
}
