// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the per-request security context.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried inside a bearer token.
///
/// Field order is fixed; it is the canonical serialization that gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username of the authenticated principal)
    pub sub: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds, exclusive)
    pub exp: i64,
}

/// Identity of the caller for a single request.
///
/// Built fresh by the authentication filter for every request and dropped with
/// it. An authenticated context can only be constructed inside this crate,
/// after the token codec has verified the subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Option<AuthenticatedUser>,
}

impl SecurityContext {
    /// Context for a public route: nobody has been authenticated.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a request whose token verified to `username`.
    pub(crate) fn verified(username: String) -> Self {
        Self {
            principal: Some(AuthenticatedUser { username }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn principal(&self) -> Option<&AuthenticatedUser> {
        self.principal.as_ref()
    }

    /// Username of the principal, or `""` for an anonymous context.
    pub fn principal_username(&self) -> &str {
        self.principal
            .as_ref()
            .map(|p| p.username.as_str())
            .unwrap_or_default()
    }
}

/// Verified principal handed to resource handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Username taken from a verified token subject
    pub username: String,
}

impl AuthenticatedUser {
    /// Whether this principal is the owner of `username`'s resources.
    pub fn owns(&self, username: &str) -> bool {
        self.username == username
    }
}
