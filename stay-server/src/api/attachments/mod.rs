//! Attachment API 模块
//!
//! - 二进制下载透传 (`GET /api/attachments?attachmentId=`)
//! - 民宿写路径使用的批量上传助手 ([`upload`])

mod handler;
pub mod upload;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/attachments", get(handler::download))
}
