// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the verified principal.
//!
//! Use the `Auth` extractor in handlers behind the authentication filter:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! The extractors never look at the `Authorization` header themselves. They
//! only read the [`SecurityContext`] that [`super::middleware::authenticate`]
//! attached after verifying the token, so a handler mounted without the filter
//! rejects every request.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedUser, SecurityContext};

/// Extractor for the authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn order_history(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<UserOrder>>, ApiError> {
///     // user.username is the verified token subject
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .and_then(SecurityContext::principal)
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingCredentials)
    }
}
