// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::codec::TokenError;

/// Why a request was refused by the authentication filter.
///
/// Every variant maps to `401 Unauthorized`. On the wire only two
/// codes are visible, `missing_credentials` and `invalid_token`; the precise
/// variant is for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable `Authorization: Bearer <token>` header
    MissingCredentials,
    /// Token could not be decoded
    MalformedToken,
    /// Token signature does not verify
    InvalidSignature,
    /// Token is past its expiry
    TokenExpired,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Error code sent to the client.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::MalformedToken | AuthError::InvalidSignature | AuthError::TokenExpired => {
                "invalid_token"
            }
        }
    }

    /// Precise failure kind, for logs only.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing",
            AuthError::MalformedToken => "malformed",
            AuthError::InvalidSignature => "bad_signature",
            AuthError::TokenExpired => "expired",
        }
    }

    fn challenge(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "Bearer",
            AuthError::MalformedToken | AuthError::InvalidSignature | AuthError::TokenExpired => {
                r#"Bearer error="invalid_token""#
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AuthError::MalformedToken,
            TokenError::BadSignature => AuthError::InvalidSignature,
            TokenError::Expired => AuthError::TokenExpired,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "Authorization header with a Bearer token is required")
            }
            AuthError::MalformedToken | AuthError::InvalidSignature | AuthError::TokenExpired => {
                write!(f, "Bearer token is invalid or expired")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let challenge = self.challenge();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });

        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        response
    }
}
