//! Booking API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Booking, BookingNew, FoodSelection, STATUS_CANCELLED, STATUS_CONFIRMED, STATUS_PENDING,
};
use crate::db::repository::{
    BookingRepository, HomestayRepository, parse_record_id,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub host_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub homestay_id: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub total_price: Option<i64>,
    #[serde(default)]
    pub food_selection: Vec<FoodSelection>,
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// GET /api/bookings?hostId=|userId= - 预订列表
///
/// 房客查自己的预订；宿主查名下所有民宿的预订。
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    let repo = BookingRepository::new(state.db.clone());

    if let Some(host_id) = params.host_id.filter(|h| !h.is_empty()) {
        // 只能查看自己的宿主档案 (管理员除外)
        if !user.is_admin() && user.host_id.as_deref() != Some(host_id.as_str()) {
            return Err(AppError::forbidden("You do not manage this host"));
        }
        let host = parse_record_id("host", &host_id);
        let bookings = repo
            .find_by_host(&host)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        return Ok(Json(bookings));
    }

    let user_id = params
        .user_id
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| user.id.clone());
    if !user.is_admin() && user_id != user.id {
        return Err(AppError::forbidden("You can only view your own bookings"));
    }

    let guest = parse_record_id("user", &user_id);
    let bookings = repo
        .find_by_user(&guest)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(bookings))
}

/// POST /api/bookings - 创建预订 (房客)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BookingPayload>,
) -> AppResult<impl IntoResponse> {
    let (homestay_id, check_in, check_out, total_price) = match (
        payload.homestay_id.filter(|h| !h.is_empty()),
        payload.check_in,
        payload.check_out,
        payload.total_price,
    ) {
        (Some(h), Some(ci), Some(co), Some(tp)) => (h, ci, co, tp),
        _ => return Err(AppError::validation("Required fields are missing")),
    };

    if check_out <= check_in {
        return Err(AppError::validation("checkOut must be after checkIn"));
    }
    if total_price <= 0 {
        return Err(AppError::validation("totalPrice must be greater than zero"));
    }

    let homestays = HomestayRepository::new(state.db.clone());
    homestays
        .find_by_id(&homestay_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Homestay not found"))?;

    let repo = BookingRepository::new(state.db.clone());
    let booking = repo
        .create(BookingNew {
            user: parse_record_id("user", &user.id),
            homestay: parse_record_id("homestay", &homestay_id),
            check_in,
            check_out,
            total_price,
            food_selection: payload.food_selection,
            status: STATUS_CONFIRMED.to_string(),
        })
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        user_id = %user.id,
        homestay_id = %homestay_id,
        total_price = total_price,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// PATCH /api/bookings/:id/status - 宿主批准 / 取消预订
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Booking>> {
    let valid = [STATUS_PENDING, STATUS_CONFIRMED, STATUS_CANCELLED];
    if !valid.contains(&payload.status.as_str()) {
        return Err(AppError::validation(format!(
            "Invalid status '{}'",
            payload.status
        )));
    }

    let repo = BookingRepository::new(state.db.clone());
    let booking = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    // 只有该民宿的宿主 (或管理员) 能改状态
    if !user.is_admin() {
        let homestays = HomestayRepository::new(state.db.clone());
        let homestay = homestays
            .find_by_id(&booking.homestay.to_string())
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| AppError::not_found("Homestay not found"))?;
        if user.host_id.as_deref() != Some(homestay.host.to_string().as_str()) {
            return Err(AppError::forbidden("You do not manage this homestay"));
        }
    }

    let updated = repo
        .update_status(&id, &payload.status)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(booking_id = %id, status = %payload.status, "Booking status updated");
    Ok(Json(updated))
}
