use serde::{Deserialize, Serialize};

/// 目录 ID 都是正整数，由各自的 catalog 分配
pub type BannerId = i64;
pub type SlotId = i64;
pub type GroupId = i64;

/// An advertisement creative, identified by its catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub description: String,
}

/// A placement location that shows one banner at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub description: String,
}

/// A viewer segment; statistics are tracked per (banner, slot, group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialGroup {
    pub id: GroupId,
    pub description: String,
}

/// Eligibility relation: the banner may be shown in the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    pub banner_id: BannerId,
    pub slot_id: SlotId,
}

/// Accumulated show/click counts for one (banner, slot, group) triple.
///
/// Both counts are non-negative and only ever grow while the counter lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub banner_id: BannerId,
    pub slot_id: SlotId,
    pub group_id: GroupId,
    pub shows: u64,
    pub clicks: u64,
}
