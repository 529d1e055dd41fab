// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{RoutePolicy, TokenCodec};
use crate::store::InMemoryStore;

/// Shared application state.
///
/// `codec` and `policy` are immutable after startup and read without locking;
/// only the store sits behind a lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub codec: Arc<TokenCodec>,
    pub policy: Arc<RoutePolicy>,
}

impl AppState {
    pub fn new(store: InMemoryStore, codec: TokenCodec, policy: RoutePolicy) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            codec: Arc::new(codec),
            policy: Arc::new(policy),
        }
    }
}
