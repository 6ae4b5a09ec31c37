//! Property API Handlers
//!
//! 民宿写路径：验证 → (可选) 批量上传附件 → 事务写库 → 组装响应。
//! 单个文件的上传失败被隔离，不影响请求整体成功。

use axum::{
    Extension, Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use shared::MessageResponse;

use crate::api::attachments::upload::{UploadFile, store_files};
use crate::api::property::payload::parse_property_form;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Homestay, HomestayNew, HomestayUpdate, Photo, serde_helpers};
use crate::db::repository::{
    AttachmentRepository, HomestayRepository, HostRepository, id_string,
};
use crate::utils::{AppError, AppResult};

// =============================================================================
// Response DTOs
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub message: String,
    pub homestay: Homestay,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub attachment_ids: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub message: String,
    pub homestay_id: String,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub attachment_ids: Vec<RecordId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub deleted_attachment_ids: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayWithAttachments {
    #[serde(flatten)]
    pub homestay: Homestay,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub attachment_ids: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayDetail {
    #[serde(flatten)]
    pub homestay: Homestay,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub homestay: HomestayDetail,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub photo_ids: Vec<RecordId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub host_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// 宿主身份校验 — 负载里的 hostId 必须与令牌推导出的宿主一致
///
/// 管理员放行。存在性检查在此之前完成，保证 400/404 契约不变。
fn ensure_owns_host(user: &CurrentUser, host: &RecordId) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    match &user.host_id {
        Some(own) if *own == host.to_string() => Ok(()),
        _ => Err(AppError::forbidden("You do not manage this host")),
    }
}

/// 验证宿主存在 (404)
async fn require_host(state: &ServerState, host: &RecordId) -> AppResult<()> {
    let repo = HostRepository::new(state.db.clone());
    repo.find_by_id(&host.to_string())
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Host not found"))?;
    Ok(())
}

/// 批量上传并过滤出存活的附件 ID，失败项只记日志
async fn upload_surviving(state: &ServerState, files: Vec<UploadFile>) -> Vec<RecordId> {
    let results = store_files(state, files).await;
    let total = results.len();
    let mut surviving = Vec::with_capacity(total);

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(id) => surviving.push(id),
            Err(e) => {
                tracing::warn!(
                    index = index + 1,
                    total = total,
                    error = %e,
                    "Skipping failed file upload"
                );
            }
        }
    }

    surviving
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/property - 创建民宿 (multipart)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> AppResult<Response> {
    let (payload, files) = parse_property_form(multipart).await?;
    let v = payload.validate(false)?;

    require_host(&state, &v.host).await?;
    ensure_owns_host(&user, &v.host)?;

    // 先上传附件，民宿行必须先于 link 行存在，附件行必须先于被引用
    let attachment_ids = upload_surviving(&state, files).await;

    let now = shared::util::now_millis();
    let repo = HomestayRepository::new(state.db.clone());
    let homestay = repo
        .create_with_links(
            HomestayNew {
                host: v.host,
                name: v.name,
                description: v.description,
                location: v.location,
                price_per_night: v.price_per_night,
                amenities: v.amenities,
                rating: 0,
                availability: v.availability,
                created_at: now,
                updated_at: now,
            },
            &attachment_ids,
        )
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        homestay_id = %id_string(&homestay.id),
        attachments = attachment_ids.len(),
        "Homestay created"
    );

    let body = CreateResponse {
        message: "Homestay added successfully".to_string(),
        homestay,
        attachment_ids,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// GET /api/property?hostId= - 宿主名下民宿列表
///
/// 每个民宿附带其关联附件 ID 列表 (每民宿一次额外查询，不做批量)。
/// 空列表按原有契约返回 404 + message 而非空 200。
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let host_id = params
        .host_id
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::validation("Host ID is required"))?;

    let host = crate::db::repository::parse_record_id("host", &host_id);
    let repo = HomestayRepository::new(state.db.clone());
    let homestays = repo
        .find_by_host(&host)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if homestays.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("No homestays found for this host")),
        )
            .into_response());
    }

    let mut result = Vec::with_capacity(homestays.len());
    for homestay in homestays {
        let attachment_ids = repo
            .find_attachment_ids(&id_string(&homestay.id))
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        result.push(HomestayWithAttachments {
            homestay,
            attachment_ids,
        });
    }

    Ok(Json(result).into_response())
}

/// GET /api/property/stays?id= - 民宿详情 (含照片元数据)
pub async fn detail(
    State(state): State<ServerState>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<DetailResponse>> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Homestay ID is required"))?;

    let repo = HomestayRepository::new(state.db.clone());
    let homestay = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Homestay not found"))?;

    let photos = repo
        .find_photos(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let photo_ids = photos.iter().map(|p| p.id.clone()).collect();

    Ok(Json(DetailResponse {
        homestay: HomestayDetail { homestay, photos },
        photo_ids,
    }))
}

/// PUT /api/property - 更新民宿 (multipart)
///
/// 顺序：附件删除 → 新文件上传 → 民宿字段全量覆盖 → 新 link 行。
/// 被删除附件的 blob 在事务提交后尽力清理。
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> AppResult<Json<UpdateResponse>> {
    let (payload, files) = parse_property_form(multipart).await?;
    let v = payload.validate(true)?;
    let id = v.id.clone().unwrap_or_default();

    let repo = HomestayRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Homestay not found"))?;

    require_host(&state, &v.host).await?;
    ensure_owns_host(&user, &existing.host)?;
    ensure_owns_host(&user, &v.host)?;

    // 事务提交后才能删 blob，先取回对象键
    let attachment_repo = AttachmentRepository::new(state.db.clone());
    let removed_blobs = attachment_repo
        .find_file_names(&v.deleted_attachment_ids)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let attachment_ids = upload_surviving(&state, files).await;

    repo.update_with_links(
        &id,
        HomestayUpdate {
            host: v.host,
            name: v.name,
            description: v.description,
            location: v.location,
            price_per_night: v.price_per_night,
            amenities: v.amenities,
            availability: v.availability,
            updated_at: shared::util::now_millis(),
        },
        &v.deleted_attachment_ids,
        &attachment_ids,
    )
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    // 孤儿 blob 清理：失败只记日志，不影响已提交的更新
    for file_name in removed_blobs {
        if let Err(e) = state.storage.delete(&file_name).await {
            tracing::warn!(file_name = %file_name, error = %e, "Failed to delete blob");
        }
    }

    tracing::info!(
        homestay_id = %id,
        added = attachment_ids.len(),
        deleted = v.deleted_attachment_ids.len(),
        "Homestay updated"
    );

    Ok(Json(UpdateResponse {
        message: "Homestay updated successfully".to_string(),
        homestay_id: id,
        attachment_ids,
        deleted_attachment_ids: v.deleted_attachment_ids,
    }))
}

/// DELETE /api/property?id= - 删除民宿
///
/// link 行、预订和餐品由存储层级联删除 (repository 事务)。
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<IdParams>,
) -> AppResult<Json<MessageResponse>> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Homestay ID is required"))?;

    let repo = HomestayRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Homestay not found"))?;

    ensure_owns_host(&user, &existing.host)?;

    let deleted = repo
        .delete_cascade(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if !deleted {
        return Err(AppError::internal("Failed to delete homestay"));
    }

    tracing::info!(homestay_id = %id, "Homestay deleted");
    Ok(Json(MessageResponse::new("Homestay deleted successfully")))
}
