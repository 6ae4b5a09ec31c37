//! Authentication Handlers
//!
//! Handles registration, login and current-user lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use shared::MessageResponse;
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserNew, VALID_ROLES};
use crate::db::repository::{HostRepository, UserRepository, id_string};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/register - 注册用户
///
/// 用户名或邮箱重复返回 409；角色非法时回落为 "user"；
/// host 角色同时建立宿主档案。
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let (username, email, password, name) = match (
        req.username.filter(|v| !v.is_empty()),
        req.email.filter(|v| !v.is_empty()),
        req.password.filter(|v| !v.is_empty()),
        req.name.filter(|v| !v.is_empty()),
    ) {
        (Some(u), Some(e), Some(p), Some(n)) => (u, e, p, n),
        _ => return Err(AppError::validation("All fields are required")),
    };

    let users = UserRepository::new(state.db.clone());
    if users
        .find_by_username_or_email(&username, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .is_some()
    {
        return Err(AppError::conflict("Username or email already exists"));
    }

    // 非法角色回落为 "user"
    let role = req
        .role
        .filter(|r| VALID_ROLES.contains(&r.as_str()))
        .unwrap_or_else(|| "user".to_string());

    let hash_pass = User::hash_password(&password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let user = users
        .create(UserNew {
            name,
            username: username.clone(),
            email,
            hash_pass,
            role: role.clone(),
            created_at: shared::util::now_millis(),
        })
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if role == "host" {
        let user_id = user
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Created user has no id"))?;
        HostRepository::new(state.db.clone())
            .create(user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
    }

    tracing::info!(username = %username, role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/auth/login - 登录
///
/// 统一错误消息与固定延迟，防止用户名枚举和计时攻击。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.login.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Login and password are required"));
    }

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_login(&req.login)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(login = %req.login, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            u
        }
        None => {
            tracing::warn!(login = %req.login, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = id_string(&user.id);

    // 宿主档案 (若有) 随令牌下发，后续写操作凭此校验身份
    let host_id = match &user.id {
        Some(uid) => HostRepository::new(state.db.clone())
            .find_by_user(uid)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .and_then(|h| h.id)
            .map(|id| id.to_string()),
        None => None,
    };

    let token = state
        .get_jwt_service()
        .generate_token(
            &user_id,
            &user.username,
            &user.name,
            &user.role,
            host_id.as_deref(),
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = %user_id,
        username = %user.username,
        role = %user.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user_id,
        name: user.name,
        role: user.role,
        host_id,
    }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(Extension(user): Extension<CurrentUser>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo {
        id: user.id,
        username: user.username,
        name: user.name,
        role: user.role,
        host_id: user.host_id,
    }))
}

/// POST /api/auth/logout - 登出
pub async fn logout(
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<MessageResponse>> {
    tracing::info!(user_id = %user.id, username = %user.username, "User logged out");
    Ok(Json(MessageResponse::new("Logged out")))
}
