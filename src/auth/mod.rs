// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the storefront API.
//!
//! ## Auth Flow
//!
//! 1. Client registers (`POST /api/user/create`) and logs in (`POST /login`)
//! 2. Login verifies the password and returns `Authorization: Bearer <token>`
//! 3. On every later request the authentication filter:
//!    - Classifies the path with the [`RoutePolicy`]
//!    - For protected paths, verifies the token with the [`TokenCodec`]
//!    - Attaches a [`SecurityContext`] or ends the request with a 401
//!
//! ## Security
//!
//! - Tokens are HMAC-SHA512 signed, checked in constant time
//! - No server-side session state; expiry is the only invalidation
//! - The signing secret is loaded once at startup and never logged
//! - Paths not listed in the policy are protected

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod policy;

pub use claims::{AuthenticatedUser, SecurityContext, TokenClaims};
pub use codec::{
    Clock, FixedClock, IssueError, IssuedToken, KeyError, SigningKey, SystemClock, TokenCodec,
    TokenError,
};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{authenticate, authorize, bearer_token, BEARER_PREFIX};
pub use password::{
    hash_password, verify_login, verify_password, PasswordError, MIN_PASSWORD_LEN,
};
pub use policy::{PathMatch, PolicyError, PolicyRule, RouteAccess, RoutePolicy};
