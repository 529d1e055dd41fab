// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication filter.
//!
//! Runs once per request, ahead of route dispatch:
//!
//! 1. Public routes (per [`RoutePolicy`]) are forwarded with an anonymous
//!    [`SecurityContext`].
//! 2. Protected routes must carry `Authorization: Bearer <token>`; the token is
//!    verified by the [`TokenCodec`].
//! 3. On success the verified context is attached to the request and the
//!    handler runs. On any failure the request ends here with a 401 and no
//!    handler, store or business logic is touched.
//!
//! The decision itself is the pure function [`authorize`]; the axum glue in
//! [`authenticate`] only threads its result into the request.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, RouteAccess, RoutePolicy, SecurityContext, TokenCodec};
use crate::state::AppState;

/// Authentication scheme keyword, including its single-space separator.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token text out of an `Authorization: Bearer <token>` header.
///
/// A missing header, a non-ASCII value, any other scheme and an empty token
/// are all reported as [`AuthError::MissingCredentials`].
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let token = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MissingCredentials)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MissingCredentials)?;

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Decide whether a request for `path` carrying `headers` may proceed.
pub fn authorize(
    policy: &RoutePolicy,
    codec: &TokenCodec,
    path: &str,
    headers: &HeaderMap,
) -> Result<SecurityContext, AuthError> {
    if policy.access_for(path) == RouteAccess::Public {
        return Ok(SecurityContext::anonymous());
    }

    let token = bearer_token(headers)?;
    let subject = codec.verify(token)?;
    Ok(SecurityContext::verified(subject))
}

/// Axum middleware wrapping [`authorize`].
///
/// # Usage
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/api/item", get(list_items))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
///     .with_state(state);
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    match authorize(&state.policy, &state.codec, path, request.headers()) {
        Ok(context) => {
            if context.is_authenticated() {
                tracing::debug!(
                    path,
                    principal = context.principal_username(),
                    "request authenticated"
                );
            }
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => {
            if err == AuthError::MissingCredentials {
                tracing::debug!(path, kind = err.kind(), "request rejected");
            } else {
                tracing::warn!(path, kind = err.kind(), "request rejected");
            }
            err.into_response()
        }
    }
}
