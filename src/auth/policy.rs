// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route access policy.
//!
//! A static table, built once at startup, that classifies each request path
//! as [`RouteAccess::Public`] or [`RouteAccess::Protected`].
//!
//! ## Matching
//!
//! 1. An [`PathMatch::Exact`] rule for the path wins.
//! 2. Otherwise the longest [`PathMatch::Prefix`] rule matching on a segment
//!    boundary applies (`/api/item` covers `/api/item` and `/api/item/7`, not
//!    `/api/items`).
//! 3. Otherwise the path is `Protected`.
//!
//! Rule sets that are ambiguous are refused by [`RoutePolicy::new`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a route requires a verified principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RouteAccess {
    /// No credential required
    Public,
    /// A valid bearer token is required
    Protected,
}

/// How a rule's pattern is compared against the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathMatch {
    Exact,
    Prefix,
}

/// One `(pattern, access)` entry of the policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    pub pattern: String,
    pub matching: PathMatch,
    pub access: RouteAccess,
}

impl PolicyRule {
    pub fn exact(pattern: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            pattern: pattern.into(),
            matching: PathMatch::Exact,
            access,
        }
    }

    pub fn prefix(pattern: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            pattern: pattern.into(),
            matching: PathMatch::Prefix,
            access,
        }
    }
}

/// Policy table configuration errors. Always fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("route pattern {0:?} must be non-empty and start with '/'")]
    InvalidPattern(String),
    #[error("prefix pattern {0:?} must not end with '/'")]
    TrailingSlash(String),
    #[error("route pattern {0:?} is listed more than once")]
    Duplicate(String),
    #[error("route pattern {0:?} is listed as both public and protected")]
    Conflicting(String),
}

/// Read-only route classification table.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    exact: HashMap<String, RouteAccess>,
    /// Sorted longest pattern first.
    prefixes: Vec<(String, RouteAccess)>,
}

impl RoutePolicy {
    /// Validate `rules` and build the lookup table.
    pub fn new(rules: impl IntoIterator<Item = PolicyRule>) -> Result<Self, PolicyError> {
        let mut exact = HashMap::new();
        let mut prefixes: HashMap<String, RouteAccess> = HashMap::new();

        for rule in rules {
            if !rule.pattern.starts_with('/') {
                return Err(PolicyError::InvalidPattern(rule.pattern));
            }
            let table = match rule.matching {
                PathMatch::Exact => &mut exact,
                PathMatch::Prefix => {
                    if rule.pattern.len() > 1 && rule.pattern.ends_with('/') {
                        return Err(PolicyError::TrailingSlash(rule.pattern));
                    }
                    &mut prefixes
                }
            };
            match table.get(&rule.pattern) {
                Some(existing) if *existing == rule.access => {
                    return Err(PolicyError::Duplicate(rule.pattern));
                }
                Some(_) => return Err(PolicyError::Conflicting(rule.pattern)),
                None => {
                    table.insert(rule.pattern, rule.access);
                }
            }
        }

        let mut prefixes: Vec<_> = prefixes.into_iter().collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self { exact, prefixes })
    }

    /// Classify a request path.
    pub fn access_for(&self, path: &str) -> RouteAccess {
        if let Some(access) = self.exact.get(path) {
            return *access;
        }

        self.prefixes
            .iter()
            .find(|(prefix, _)| prefix_matches(prefix, path))
            .map(|(_, access)| *access)
            .unwrap_or(RouteAccess::Protected)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.access_for(path) == RouteAccess::Public
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
