//! Menu Item Model
//!
//! 民宿提供的餐品，可选关联一张附件图片 (附件被删除时关联置空)。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item ID type
pub type MenuItemId = RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MenuItemId>,
    #[serde(with = "serde_helpers::record_id")]
    pub homestay: RecordId,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub attachment: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: i64,
    /// breakfast | lunch | dinner | snack
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemNew {
    #[serde(with = "serde_helpers::record_id")]
    pub homestay: RecordId,
    #[serde(with = "serde_helpers::option_record_id")]
    pub attachment: Option<RecordId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Update payload — 缺省字段保留旧值 (MERGE 语义)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub attachment: Option<RecordId>,
}
