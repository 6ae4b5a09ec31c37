//! Chat API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/chats", get(handler::list).post(handler::open))
        .route("/api/chats/{id}/messages", post(handler::append_message))
}
