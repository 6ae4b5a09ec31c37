//! Booking Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking ID type
pub type BookingId = RecordId;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// 预订时随单选择的餐品
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSelection {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    /// Record link to user (guest)
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Record link to homestay
    #[serde(with = "serde_helpers::record_id")]
    pub homestay: RecordId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    #[serde(default)]
    pub food_selection: Vec<FoodSelection>,
    /// pending | confirmed | cancelled
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    STATUS_CONFIRMED.to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNew {
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub homestay: RecordId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub food_selection: Vec<FoodSelection>,
    pub status: String,
}
