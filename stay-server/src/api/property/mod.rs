//! Property API 模块

mod handler;
pub mod payload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};

use crate::core::ServerState;

/// multipart 请求体上限 (JSON 负载 + 多文件)
const MAX_FORM_BODY: usize = 32 * 1024 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/property",
            get(handler::list)
                .post(handler::create)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/api/property/stays", get(handler::detail))
        .layer(DefaultBodyLimit::max(MAX_FORM_BODY))
}
