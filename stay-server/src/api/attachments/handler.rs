//! Attachment Download Handler

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use http::header;
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::AttachmentRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadParams {
    pub attachment_id: Option<String>,
}

/// GET /api/attachments?attachmentId= - 附件二进制透传
///
/// `Content-Type` 和 `Content-Disposition` 取自附件元数据行。
pub async fn download(
    State(state): State<ServerState>,
    Query(params): Query<DownloadParams>,
) -> AppResult<Response> {
    let attachment_id = params
        .attachment_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Attachment ID is required"))?;

    let repo = AttachmentRepository::new(state.db.clone());
    let attachment = repo
        .find_by_id(&attachment_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Attachment not found"))?;

    let data = state
        .storage
        .read(&attachment.file_name)
        .await
        .map_err(|e| {
            tracing::error!(
                attachment_id = %attachment_id,
                file_name = %attachment.file_name,
                error = %e,
                "Blob download failed"
            );
            AppError::upstream("Failed to download file")
        })?;

    let headers = [
        (header::CONTENT_TYPE, attachment.file_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", attachment.file_name),
        ),
    ];

    Ok((headers, data).into_response())
}
