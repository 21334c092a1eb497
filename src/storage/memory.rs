use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::errors::{Result, RotatorError};

use super::models::{Banner, BannerId, Counter, GroupId, Slot, SlotId, SocialGroup};
use super::Storage;

type CounterKey = (BannerId, SlotId, GroupId);

#[derive(Debug, Clone, Copy, Default)]
struct CounterCell {
    shows: u64,
    clicks: u64,
}

/// In-memory counter store.
///
/// The counter table lives in a sharded `DashMap`; a shard write lock is
/// held only for the duration of one key's update, so increments on
/// disjoint keys proceed in parallel while increments on the same key are
/// serialized. Reads take the shard read lock and see a whole row at once.
pub struct MemoryStorage {
    banners: DashMap<BannerId, Banner>,
    slots: DashMap<SlotId, Slot>,
    groups: DashMap<GroupId, SocialGroup>,
    // (slot, banner) 有序存放，按 slot 做范围扫描即得升序候选
    rotations: RwLock<BTreeSet<(SlotId, BannerId)>>,
    counters: DashMap<CounterKey, CounterCell>,
    next_banner_id: AtomicI64,
    next_slot_id: AtomicI64,
    next_group_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            banners: DashMap::new(),
            slots: DashMap::new(),
            groups: DashMap::new(),
            rotations: RwLock::new(BTreeSet::new()),
            counters: DashMap::new(),
            next_banner_id: AtomicI64::new(1),
            next_slot_id: AtomicI64::new(1),
            next_group_id: AtomicI64::new(1),
        }
    }

    fn missing_counter(banner_id: BannerId, slot_id: SlotId, group_id: GroupId) -> RotatorError {
        RotatorError::not_found(format!(
            "no counter for banner {} in slot {} / group {}",
            banner_id, slot_id, group_id
        ))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_banner(&self, description: &str) -> Result<BannerId> {
        let id = self.next_banner_id.fetch_add(1, Ordering::Relaxed);
        self.banners.insert(
            id,
            Banner {
                id,
                description: description.to_string(),
            },
        );
        Ok(id)
    }

    async fn create_slot(&self, description: &str) -> Result<SlotId> {
        let id = self.next_slot_id.fetch_add(1, Ordering::Relaxed);
        self.slots.insert(
            id,
            Slot {
                id,
                description: description.to_string(),
            },
        );
        Ok(id)
    }

    async fn create_group(&self, description: &str) -> Result<GroupId> {
        let id = self.next_group_id.fetch_add(1, Ordering::Relaxed);
        self.groups.insert(
            id,
            SocialGroup {
                id,
                description: description.to_string(),
            },
        );

        // 为所有已有轮换补零值计数器，保证新分组立即可选
        let pairs: Vec<(SlotId, BannerId)> = self.rotations.read().iter().copied().collect();
        for (slot_id, banner_id) in pairs {
            self.counters
                .entry((banner_id, slot_id, id))
                .or_insert_with(CounterCell::default);
        }

        debug!("created social group {}", id);
        Ok(id)
    }

    async fn get_banner(&self, banner_id: BannerId) -> Result<Option<Banner>> {
        Ok(self.banners.get(&banner_id).map(|entry| entry.clone()))
    }

    async fn group_ids(&self) -> Result<Vec<GroupId>> {
        let mut ids: Vec<GroupId> = self.groups.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn banners_for_slot(&self, slot_id: SlotId) -> Result<Vec<BannerId>> {
        let rotations = self.rotations.read();
        Ok(rotations
            .range((slot_id, BannerId::MIN)..=(slot_id, BannerId::MAX))
            .map(|(_, banner_id)| *banner_id)
            .collect())
    }

    async fn get_counters(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        banner_ids: &[BannerId],
    ) -> Result<Vec<Counter>> {
        let mut ids = banner_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut result = Vec::with_capacity(ids.len());
        for banner_id in ids {
            if let Some(cell) = self.counters.get(&(banner_id, slot_id, group_id)) {
                result.push(Counter {
                    banner_id,
                    slot_id,
                    group_id,
                    shows: cell.shows,
                    clicks: cell.clicks,
                });
            }
        }
        Ok(result)
    }

    async fn increment_show(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        match self.counters.get_mut(&(banner_id, slot_id, group_id)) {
            Some(mut cell) => {
                cell.shows += 1;
                Ok(())
            }
            None => Err(Self::missing_counter(banner_id, slot_id, group_id)),
        }
    }

    async fn increment_click(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()> {
        match self.counters.get_mut(&(banner_id, slot_id, group_id)) {
            Some(mut cell) => {
                cell.clicks += 1;
                Ok(())
            }
            None => Err(Self::missing_counter(banner_id, slot_id, group_id)),
        }
    }

    async fn attach_banner_to_slot(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        all_group_ids: &[GroupId],
    ) -> Result<()> {
        self.rotations.write().insert((slot_id, banner_id));

        // entry().or_insert 保证并发重复调用不会产生重复计数器
        for group_id in all_group_ids {
            self.counters
                .entry((banner_id, slot_id, *group_id))
                .or_insert_with(CounterCell::default);
        }

        debug!("attached banner {} to slot {}", banner_id, slot_id);
        Ok(())
    }

    async fn detach_banner_from_slot(&self, banner_id: BannerId, slot_id: SlotId) -> Result<()> {
        self.rotations.write().remove(&(slot_id, banner_id));
        // 历史计数器保留，重新挂载后继续累计
        debug!("detached banner {} from slot {}", banner_id, slot_id);
        Ok(())
    }

    async fn get_backend_name(&self) -> String {
        "memory".to_string()
    }
}
