//! Menu Item API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/menu-items", get(handler::list).post(handler::create))
        .route(
            "/api/menu-items/{id}",
            put(handler::update).delete(handler::delete),
        )
}
