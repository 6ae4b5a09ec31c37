//! Statistics API Handlers
//!
//! 宿主看板的营收汇总：已成立 (非取消) 预订的总额与按民宿拆分。

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{STATUS_CANCELLED, serde_helpers};
use crate::db::repository::{BookingRepository, HomestayRepository, id_string, parse_record_id};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueParams {
    pub host_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayRevenue {
    #[serde(with = "serde_helpers::record_id")]
    pub homestay_id: RecordId,
    pub name: String,
    pub booking_count: u64,
    pub revenue: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueResponse {
    pub booking_count: u64,
    pub total_revenue: i64,
    pub per_homestay: Vec<HomestayRevenue>,
}

/// GET /api/statistics/revenue?hostId= - 宿主营收汇总
pub async fn revenue(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<RevenueParams>,
) -> AppResult<Json<RevenueResponse>> {
    let host_id = params
        .host_id
        .filter(|h| !h.is_empty())
        .or_else(|| user.host_id.clone())
        .ok_or_else(|| AppError::validation("Host ID is required"))?;

    if !user.is_admin() && user.host_id.as_deref() != Some(host_id.as_str()) {
        return Err(AppError::forbidden("You do not manage this host"));
    }

    let host = parse_record_id("host", &host_id);

    let homestays = HomestayRepository::new(state.db.clone())
        .find_by_host(&host)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let bookings = BookingRepository::new(state.db.clone())
        .find_by_host(&host)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut per_homestay: HashMap<String, HomestayRevenue> = homestays
        .into_iter()
        .filter_map(|h| {
            let id = h.id?;
            Some((
                id.to_string(),
                HomestayRevenue {
                    homestay_id: id,
                    name: h.name,
                    booking_count: 0,
                    revenue: 0,
                },
            ))
        })
        .collect();

    let mut booking_count = 0u64;
    let mut total_revenue = 0i64;
    for booking in bookings {
        if booking.status == STATUS_CANCELLED {
            continue;
        }
        booking_count += 1;
        total_revenue += booking.total_price;
        if let Some(entry) = per_homestay.get_mut(&booking.homestay.to_string()) {
            entry.booking_count += 1;
            entry.revenue += booking.total_price;
        }
    }

    let mut per_homestay: Vec<HomestayRevenue> = per_homestay.into_values().collect();
    per_homestay.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.name.cmp(&b.name)));

    tracing::debug!(
        host_id = %id_string(&Some(host)),
        booking_count = booking_count,
        total_revenue = total_revenue,
        "Revenue summary computed"
    );

    Ok(Json(RevenueResponse {
        booking_count,
        total_revenue,
        per_homestay,
    }))
}
