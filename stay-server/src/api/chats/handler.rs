//! Chat API Handlers
//!
//! 房客与宿主的会话。参与者校验：user 侧对比用户 ID，host 侧对比
//! 令牌中的宿主档案 ID。

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Chat, ChatMessage};
use crate::db::repository::{ChatRepository, HostRepository, parse_record_id};
use crate::utils::validation::{MAX_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenChatPayload {
    pub host_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    pub body: String,
}

fn is_participant(user: &CurrentUser, chat: &Chat) -> bool {
    if user.is_admin() {
        return true;
    }
    if chat.user.to_string() == user.id {
        return true;
    }
    matches!(&user.host_id, Some(h) if *h == chat.host.to_string())
}

/// GET /api/chats - 当前用户参与的会话
///
/// 宿主看到名下档案的会话，房客看到自己发起的会话。
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Chat>>> {
    let repo = ChatRepository::new(state.db.clone());

    let chats = if let Some(host_id) = &user.host_id {
        let host = parse_record_id("host", host_id);
        repo.find_by_host(&host)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
    } else {
        let guest = parse_record_id("user", &user.id);
        repo.find_by_user(&guest)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
    };

    Ok(Json(chats))
}

/// POST /api/chats - 打开 (或复用) 与宿主的会话 (房客)
pub async fn open(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OpenChatPayload>,
) -> AppResult<impl IntoResponse> {
    let host_id = payload
        .host_id
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::validation("Host ID is required"))?;

    let host = parse_record_id("host", &host_id);
    HostRepository::new(state.db.clone())
        .find_by_id(&host.to_string())
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Host not found"))?;

    let chat = ChatRepository::new(state.db.clone())
        .find_or_create(parse_record_id("user", &user.id), host)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// POST /api/chats/:id/messages - 追加消息
pub async fn append_message(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MessagePayload>,
) -> AppResult<Json<Chat>> {
    validate_required_text(&payload.body, "body", MAX_TEXT_LEN)?;

    let repo = ChatRepository::new(state.db.clone());
    let chat = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Chat not found"))?;

    if !is_participant(&user, &chat) {
        return Err(AppError::forbidden("You are not part of this chat"));
    }

    let sender = if chat.user.to_string() == user.id {
        "user"
    } else {
        "host"
    };

    let updated = repo
        .append_message(
            &id,
            ChatMessage {
                sender: sender.to_string(),
                body: payload.body,
                sent_at: shared::util::now_millis(),
            },
        )
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(updated))
}
