// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the storefront API. All types derive
//! serde traits and `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! Request bodies use the camelCase field names existing storefront clients
//! send (`itemId`, `confirmPassword`). Money is integer cents.
//!
//! ## Model Categories
//!
//! - **Users**: Registration, login and the public user view
//! - **Items**: Catalog entries
//! - **Carts / Orders**: Per-user cart and its submitted snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// User Models
// =============================================================================

/// Public view of a registered user. Never carries credential material.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    /// Numeric user identifier.
    pub id: u64,
    /// Unique, immutable username.
    pub username: String,
}

/// Registration request for `POST /api/user/create`.
#[derive(Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Login request for `POST /login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Successful login.
///
/// The same token is also returned in the `Authorization` response header.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginResponse {
    pub username: String,
    /// Opaque bearer token.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

// =============================================================================
// Item Models
// =============================================================================

/// A catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    /// Unit price in cents.
    pub price_cents: u64,
    pub description: String,
}

// =============================================================================
// Cart / Order Models
// =============================================================================

/// A user's shopping cart. Holds one entry per unit added.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Cart {
    pub id: u64,
    pub username: String,
    pub items: Vec<Item>,
    /// Sum of `items` prices in cents.
    pub total_cents: u64,
}

/// Request body for `addToCart` / `removeFromCart`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: u64,
    pub quantity: u32,
}

/// A submitted order: a snapshot of the cart at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserOrder {
    pub id: Uuid,
    pub username: String,
    pub items: Vec<Item>,
    pub total_cents: u64,
    pub created_at: DateTime<Utc>,
}
