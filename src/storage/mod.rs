use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{Banner, BannerId, Counter, GroupId, Rotation, SlotId, SocialGroup};

/// Counter store and catalog backend.
///
/// Mutations on the same (banner, slot, group) key are serialized by the
/// backend (shard lock in memory, row lock in SQL); disjoint keys do not
/// block each other. Every operation that returns banner-keyed rows
/// returns them in ascending banner id, so callers that break ties by
/// input order behave the same against every backend.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_banner(&self, description: &str) -> Result<BannerId>;
    async fn create_slot(&self, description: &str) -> Result<SlotId>;

    /// 新建分组时为已有的 (banner, slot) 轮换补零值计数器
    async fn create_group(&self, description: &str) -> Result<GroupId>;

    async fn get_banner(&self, banner_id: BannerId) -> Result<Option<Banner>>;

    /// All known group ids, ascending.
    async fn group_ids(&self) -> Result<Vec<GroupId>>;

    /// Banner ids currently in rotation for the slot, ascending.
    async fn banners_for_slot(&self, slot_id: SlotId) -> Result<Vec<BannerId>>;

    /// Counters for the requested banners in this (slot, group).
    ///
    /// Ids without a stored counter are omitted. Each returned row is a
    /// consistent snapshot of its two counts; rows from one call may
    /// reflect different points in time.
    async fn get_counters(
        &self,
        slot_id: SlotId,
        group_id: GroupId,
        banner_ids: &[BannerId],
    ) -> Result<Vec<Counter>>;

    /// Adds 1 to the show count. Fails with `NotFound` if the counter
    /// does not exist; never creates one.
    async fn increment_show(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()>;

    /// Adds 1 to the click count. Same existence semantics as
    /// [`Storage::increment_show`].
    async fn increment_click(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        group_id: GroupId,
    ) -> Result<()>;

    /// Idempotently puts (banner, slot) into rotation and materializes a
    /// zero-valued counter for every id in `all_group_ids` that has none
    /// yet. Safe against concurrent identical calls.
    async fn attach_banner_to_slot(
        &self,
        banner_id: BannerId,
        slot_id: SlotId,
        all_group_ids: &[GroupId],
    ) -> Result<()>;

    /// Removes the rotation entry. Historical counters are retained, so
    /// re-attaching the pair resumes its statistics.
    async fn detach_banner_from_slot(&self, banner_id: BannerId, slot_id: SlotId) -> Result<()>;

    async fn get_backend_name(&self) -> String;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<dyn Storage>> {
        let config = crate::config::get_config();

        if config.database.backend == "memory" {
            return Ok(Arc::new(MemoryStorage::new()));
        }

        // 从 URL 自动推断数据库类型
        let database_url = &config.database.url;
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
