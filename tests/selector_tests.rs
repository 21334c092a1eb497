//! Selector behavior tests against the in-memory store
//!
//! Exercises the full pick pipeline: candidate lookup, UCB scoring and
//! the show record.

use std::collections::HashSet;
use std::sync::Arc;

use banner_rotator::errors::RotatorError;
use banner_rotator::services::BannerSelector;
use banner_rotator::storage::{MemoryStorage, Storage};

/// slot、group 各一个，banner 五个并全部挂载
async fn seeded_selector() -> (BannerSelector, Arc<dyn Storage>, i64, i64, Vec<i64>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    let slot_id = storage.create_slot("front page").await.unwrap();
    let group_id = storage.create_group("students").await.unwrap();

    let mut banner_ids = Vec::new();
    for n in 1..=5 {
        let id = storage
            .create_banner(&format!("banner {}", n))
            .await
            .unwrap();
        storage
            .attach_banner_to_slot(id, slot_id, &[group_id])
            .await
            .unwrap();
        banner_ids.push(id);
    }

    let selector = BannerSelector::new(storage.clone());
    (selector, storage, slot_id, group_id, banner_ids)
}

#[tokio::test]
async fn cold_start_picks_lowest_banner_id() {
    let (selector, _storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    let banner = selector.pick(slot_id, group_id).await.unwrap();
    assert_eq!(banner.id, banner_ids[0]);
}

#[tokio::test]
async fn every_banner_is_shown_once_before_any_repeat() {
    let (selector, _storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    let mut seen = HashSet::new();
    for _ in 0..banner_ids.len() {
        let banner = selector.pick(slot_id, group_id).await.unwrap();
        assert!(seen.insert(banner.id), "banner {} repeated early", banner.id);
    }
    assert_eq!(seen.len(), banner_ids.len());
}

#[tokio::test]
async fn pick_records_the_show() {
    let (selector, storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    let banner = selector.pick(slot_id, group_id).await.unwrap();

    let counters = storage
        .get_counters(slot_id, group_id, &banner_ids)
        .await
        .unwrap();
    let total_shows: u64 = counters.iter().map(|c| c.shows).sum();
    assert_eq!(total_shows, 1);
    let chosen = counters.iter().find(|c| c.banner_id == banner.id).unwrap();
    assert_eq!(chosen.shows, 1);
}

#[tokio::test]
async fn clicked_banner_wins_once_all_have_shows() {
    let (selector, storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    for &banner_id in &banner_ids {
        for _ in 0..10 {
            storage
                .increment_show(banner_id, slot_id, group_id)
                .await
                .unwrap();
        }
    }
    for _ in 0..3 {
        storage
            .increment_click(banner_ids[1], slot_id, group_id)
            .await
            .unwrap();
    }

    let banner = selector.pick(slot_id, group_id).await.unwrap();
    assert_eq!(banner.id, banner_ids[1]);
}

#[tokio::test]
async fn under_shown_banner_wins_at_equal_clicks() {
    let (selector, storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    for (index, &banner_id) in banner_ids.iter().enumerate() {
        let shows = if index == banner_ids.len() - 1 { 9 } else { 10 };
        for _ in 0..shows {
            storage
                .increment_show(banner_id, slot_id, group_id)
                .await
                .unwrap();
        }
        for _ in 0..3 {
            storage
                .increment_click(banner_id, slot_id, group_id)
                .await
                .unwrap();
        }
    }

    let banner = selector.pick(slot_id, group_id).await.unwrap();
    assert_eq!(banner.id, *banner_ids.last().unwrap());
}

#[tokio::test]
async fn empty_slot_is_no_candidates() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let slot_id = storage.create_slot("empty slot").await.unwrap();
    let group_id = storage.create_group("students").await.unwrap();
    let selector = BannerSelector::new(storage);

    let err = selector.pick(slot_id, group_id).await.unwrap_err();
    assert!(matches!(err, RotatorError::NoCandidates(_)));
}

#[tokio::test]
async fn group_without_counters_is_no_candidates() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let slot_id = storage.create_slot("front page").await.unwrap();
    let banner_id = storage.create_banner("orphan").await.unwrap();

    // 挂载时还没有任何分组
    storage
        .attach_banner_to_slot(banner_id, slot_id, &[])
        .await
        .unwrap();

    let selector = BannerSelector::new(storage);
    let err = selector.pick(slot_id, 42).await.unwrap_err();
    assert!(matches!(err, RotatorError::NoCandidates(_)));
}

#[tokio::test]
async fn single_banner_is_always_selected() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let slot_id = storage.create_slot("front page").await.unwrap();
    let group_id = storage.create_group("students").await.unwrap();
    let banner_id = storage.create_banner("only one").await.unwrap();
    storage
        .attach_banner_to_slot(banner_id, slot_id, &[group_id])
        .await
        .unwrap();

    let selector = BannerSelector::new(storage.clone());
    for _ in 0..3 {
        let banner = selector.pick(slot_id, group_id).await.unwrap();
        assert_eq!(banner.id, banner_id);
    }

    let counters = storage
        .get_counters(slot_id, group_id, &[banner_id])
        .await
        .unwrap();
    assert_eq!(counters[0].shows, 3);
}

#[tokio::test]
async fn record_click_forwards_to_store() {
    let (selector, storage, slot_id, group_id, banner_ids) = seeded_selector().await;

    selector
        .record_click(banner_ids[2], slot_id, group_id)
        .await
        .unwrap();

    let counters = storage
        .get_counters(slot_id, group_id, &[banner_ids[2]])
        .await
        .unwrap();
    assert_eq!(counters[0].clicks, 1);
    assert_eq!(counters[0].shows, 0);
}

#[tokio::test]
async fn record_click_without_counter_is_not_found() {
    let (selector, _storage, slot_id, group_id, _banner_ids) = seeded_selector().await;

    let err = selector
        .record_click(9999, slot_id, group_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RotatorError::NotFound(_)));
}
