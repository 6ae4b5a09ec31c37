//! Homestay Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Homestay ID type
pub type HomestayId = RecordId;

/// 结构化地址 + 坐标
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
}

/// 单日可订状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    pub is_available: bool,
}

/// Homestay model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homestay {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<HomestayId>,
    /// Record link to host
    #[serde(with = "serde_helpers::record_id")]
    pub host: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// 评分，创建时固定为 0
    #[serde(default)]
    pub rating: i64,
    pub availability: Vec<AvailabilitySlot>,
    /// 创建时间 (Unix millis)
    #[serde(default)]
    pub created_at: i64,
    /// 更新时间 (Unix millis)
    #[serde(default)]
    pub updated_at: i64,
}

/// Insert payload (no id — SurrealDB generates one)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayNew {
    #[serde(with = "serde_helpers::record_id")]
    pub host: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: i64,
    pub amenities: Vec<String>,
    pub rating: i64,
    pub availability: Vec<AvailabilitySlot>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Update payload — 全量覆盖语义
///
/// 除 `description` (缺省时保留旧值) 外，所有字段都用请求值覆盖，
/// 包括空集合。`rating` 和 `created_at` 不在更新范围内。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayUpdate {
    #[serde(with = "serde_helpers::record_id")]
    pub host: RecordId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: i64,
    pub amenities: Vec<String>,
    pub availability: Vec<AvailabilitySlot>,
    pub updated_at: i64,
}
