//! Booking API 模块

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/bookings", get(handler::list).post(handler::create))
        .route("/api/bookings/{id}/status", patch(handler::update_status))
}
