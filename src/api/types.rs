//! API 类型定义

use serde::{Deserialize, Serialize};

use crate::storage::{BannerId, GroupId, SlotId};

// 挂载/摘除直接复用 storage::Rotation 作为请求体

/// 统一 JSON 响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// (slot, group) 查询参数，选 banner 和读统计共用
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SlotGroupQuery {
    pub slot_id: SlotId,
    pub group_id: GroupId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClickBody {
    pub banner_id: BannerId,
    pub slot_id: SlotId,
    pub group_id: GroupId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewCatalogItem {
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatedId {
    pub id: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
    pub uptime_seconds: i64,
}
