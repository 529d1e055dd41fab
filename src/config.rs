// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup. Any error here
//! is fatal: the process refuses to start rather than run with a weak or
//! missing signing secret.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SIGNING_SECRET` | HMAC secret for bearer tokens (>= 32 bytes) | Required |
//! | `TOKEN_VALIDITY_SECS` | Token lifetime in seconds | `864000` (10 days) |
//! | `SEED_CATALOG` | Load the demo item catalog | `true` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::auth::{KeyError, SigningKey};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SIGNING_SECRET_ENV: &str = "TOKEN_SIGNING_SECRET";
pub const TOKEN_VALIDITY_ENV: &str = "TOKEN_VALIDITY_SECS";
pub const SEED_CATALOG_ENV: &str = "SEED_CATALOG";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TOKEN_VALIDITY_SECS: u64 = 864_000;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOKEN_SIGNING_SECRET must be set")]
    MissingSecret,
    #[error("invalid signing secret: {0}")]
    Secret(#[from] KeyError),
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub signing_key: SigningKey,
    pub token_validity: Duration,
    pub seed_catalog: bool,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host: IpAddr = parse_or(&lookup, HOST_ENV, DEFAULT_HOST.parse().ok())?;
        let port: u16 = parse_or(&lookup, PORT_ENV, Some(DEFAULT_PORT))?;

        let secret = lookup(SIGNING_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        let signing_key = SigningKey::from_bytes(secret.as_bytes())?;

        let validity_secs: u64 = parse_or(
            &lookup,
            TOKEN_VALIDITY_ENV,
            Some(DEFAULT_TOKEN_VALIDITY_SECS),
        )?;
        if validity_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: TOKEN_VALIDITY_ENV,
                value: "0".to_string(),
            });
        }

        let seed_catalog = parse_or(&lookup, SEED_CATALOG_ENV, Some(true))?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            signing_key,
            token_validity: Duration::from_secs(validity_secs),
            seed_catalog,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => default.ok_or(ConfigError::InvalidValue {
            var,
            value: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "config-test-secret-0123456789abcdefghij";

    fn load(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_with_only_secret() {
        let config = load(&[(SIGNING_SECRET_ENV, SECRET)]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.token_validity, Duration::from_secs(864_000));
        assert!(config.seed_catalog);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            (SIGNING_SECRET_ENV, SECRET),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (TOKEN_VALIDITY_ENV, "900"),
            (SEED_CATALOG_ENV, "false"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.token_validity, Duration::from_secs(900));
        assert!(!config.seed_catalog);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_or_empty_secret_is_fatal() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingSecret)));
        assert!(matches!(
            load(&[(SIGNING_SECRET_ENV, "")]),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn short_secret_is_fatal() {
        assert!(matches!(
            load(&[(SIGNING_SECRET_ENV, "too-short")]),
            Err(ConfigError::Secret(KeyError::TooShort { .. }))
        ));
    }

    #[test]
    fn invalid_values_are_reported() {
        for (var, value) in [
            (PORT_ENV, "eighty"),
            (TOKEN_VALIDITY_ENV, "0"),
            (TOKEN_VALIDITY_ENV, "-5"),
            (LOG_FORMAT_ENV, "xml"),
            (HOST_ENV, "not-an-ip"),
        ] {
            let result = load(&[(SIGNING_SECRET_ENV, SECRET), (var, value)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { var: v, .. }) if v == var),
                "{var}={value}"
            );
        }
    }

    #[test]
    fn secret_does_not_leak_through_debug() {
        let config = load(&[(SIGNING_SECRET_ENV, SECRET)]).unwrap();
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
