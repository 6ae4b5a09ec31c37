//! Menu Item API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use surrealdb::RecordId;

use shared::MessageResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemNew, MenuItemUpdate};
use crate::db::repository::{HomestayRepository, MenuItemRepository, parse_record_id};
use crate::utils::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub homestay_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPayload {
    pub homestay_id: Option<String>,
    pub attachment_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// 校验当前用户是该民宿的宿主 (或管理员)，返回民宿宿主 ID
async fn require_homestay_owner(
    state: &ServerState,
    user: &CurrentUser,
    homestay: &RecordId,
) -> AppResult<()> {
    let repo = HomestayRepository::new(state.db.clone());
    let homestay = repo
        .find_by_id(&homestay.to_string())
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Homestay not found"))?;

    if !user.is_admin() && user.host_id.as_deref() != Some(homestay.host.to_string().as_str()) {
        return Err(AppError::forbidden("You do not manage this homestay"));
    }
    Ok(())
}

/// GET /api/menu-items?homestayId= - 民宿餐单
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let homestay_id = params
        .homestay_id
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::validation("Homestay ID is required"))?;

    let homestay = parse_record_id("homestay", &homestay_id);
    let items = MenuItemRepository::new(state.db.clone())
        .find_by_homestay(&homestay)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(items))
}

/// POST /api/menu-items - 添加餐品 (宿主)
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<MenuItemPayload>,
) -> AppResult<impl IntoResponse> {
    let (homestay_id, name, price, kind) = match (
        payload.homestay_id.filter(|h| !h.is_empty()),
        payload.name.filter(|n| !n.trim().is_empty()),
        payload.price,
        payload.kind.filter(|t| !t.is_empty()),
    ) {
        (Some(h), Some(n), Some(p), Some(t)) => (h, n, p, t),
        _ => return Err(AppError::validation("Required fields are missing")),
    };

    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if price <= 0 {
        return Err(AppError::validation("Price must be greater than zero"));
    }

    let homestay = parse_record_id("homestay", &homestay_id);
    require_homestay_owner(&state, &user, &homestay).await?;

    let item = MenuItemRepository::new(state.db.clone())
        .create(MenuItemNew {
            homestay,
            attachment: payload
                .attachment_id
                .map(|id| parse_record_id("attachment", &id)),
            name,
            description: payload.description,
            price,
            kind,
        })
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu-items/:id - 更新餐品 (宿主)
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemPayload>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;

    require_homestay_owner(&state, &user, &existing.homestay).await?;

    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if let Some(price) = payload.price
        && price <= 0
    {
        return Err(AppError::validation("Price must be greater than zero"));
    }

    let updated = repo
        .update(
            &id,
            MenuItemUpdate {
                name: payload.name,
                description: payload.description,
                price: payload.price,
                kind: payload.kind,
                attachment: payload
                    .attachment_id
                    .map(|a| parse_record_id("attachment", &a)),
            },
        )
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(updated))
}

/// DELETE /api/menu-items/:id - 删除餐品 (宿主)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Menu item not found"))?;

    require_homestay_owner(&state, &user, &existing.homestay).await?;

    repo.delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(MessageResponse::new("Menu item deleted successfully")))
}
