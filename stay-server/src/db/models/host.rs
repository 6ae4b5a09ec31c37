//! Host Model
//!
//! 宿主档案 — 允许拥有民宿的用户角色。民宿归属通过 `homestay.host`
//! 反向推导，不在 host 上冗余存储。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Host ID type
pub type HostId = RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<HostId>,
    /// Record link to user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNew {
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
}
