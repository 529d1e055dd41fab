// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: registration, login and lookup.
//!
//! Registration and login are the only routes that accept a password. Both are
//! public; everything else here requires a verified principal.

use axum::{
    extract::{Path, State},
    http::header::AUTHORIZATION,
    response::IntoResponse,
    Json,
};

use crate::{
    auth::{hash_password, verify_login, Auth, AuthenticatedUser, BEARER_PREFIX, MIN_PASSWORD_LEN},
    error::ApiError,
    models::{CreateUserRequest, LoginRequest, LoginResponse, User},
    state::AppState,
};

const INVALID_LOGIN: &str = "Invalid username or password";

/// Names that collide with static routes under `/api/user/`.
const RESERVED_USERNAMES: [&str; 3] = ["me", "create", "id"];

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::bad_request("Username must not be empty"));
    }
    if username.contains('/') {
        return Err(ApiError::bad_request("Username must not contain '/'"));
    }
    if RESERVED_USERNAMES.contains(&username) {
        return Err(ApiError::bad_request(format!(
            "Username '{username}' is reserved"
        )));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/user/create",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 200, description = "User registered", body = User),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let username = request.username.trim().to_string();
    validate_username(&username)?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if request.password != request.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    let password = request.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let user = state.store.write().await.create_user(username, hash)?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(Json(user))
}

/// Exchange a username and password for a bearer token.
///
/// The token is returned both in the `Authorization` response header and in
/// the body. Unknown users and wrong passwords get the same 401 after the same
/// Argon2 work. The username is trimmed as at registration.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse,
            headers(("Authorization" = String, description = "Bearer token"))),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = request.username.trim().to_string();
    let stored_hash = state
        .store
        .read()
        .await
        .password_hash(&username)
        .map(str::to_owned);
    let known_user = stored_hash.is_some();

    let password = request.password;
    let matches =
        tokio::task::spawn_blocking(move || verify_login(&password, stored_hash.as_deref()))
            .await
            .map_err(ApiError::internal)?;
    if !matches {
        if known_user {
            tracing::warn!(username = %username, "Login with wrong password");
        } else {
            tracing::warn!(username = %username, "Login for unknown user");
        }
        return Err(ApiError::unauthorized(INVALID_LOGIN));
    }

    let issued = state.codec.issue(&username)?;
    tracing::info!(username = %username, expires_at = issued.expires_at, "Token issued");

    let header = format!("{BEARER_PREFIX}{}", issued.token);
    let body = LoginResponse {
        username,
        token: issued.token,
        token_type: BEARER_PREFIX.trim_end().to_string(),
        expires_at: issued.expires_at,
    };
    Ok(([(AUTHORIZATION, header)], Json(body)))
}

/// Identity of the caller, as carried by the verified token.
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated principal", body = AuthenticatedUser),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn current_user(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}

#[utoipa::path(
    get,
    path = "/api/user/id/{id}",
    params(("id" = u64, Path, description = "Numeric user id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn user_by_id(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .read()
        .await
        .user_by_id(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

#[utoipa::path(
    get,
    path = "/api/user/{username}",
    params(("username" = String, Path, description = "Username to look up")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn user_by_username(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .store
        .read()
        .await
        .user_by_username(&username)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
