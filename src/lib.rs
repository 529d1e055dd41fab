// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sareeta Gateway - Stateless Request Authentication for the Storefront API
//!
//! Every request passes the authentication filter before it reaches a
//! handler. Public paths go through anonymously; protected paths need a valid
//! bearer token issued by `POST /login`.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers, router and route policy table (Axum)
//! - `auth` - Token codec, route policy, authentication filter, extractors
//! - `config` - Startup configuration from the environment
//! - `store` - In-memory users, catalog, carts and orders

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
