// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret for bearer tokens | Empty (verify path returns 503) |
//! | `DATA_DIR` | Directory holding the auth database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `NONCE_TTL_SECS` | Challenge nonce lifetime in seconds | `600` |
//! | `TOKEN_TTL_SECS` | Bearer token lifetime in seconds | `900` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use chrono::Duration;

/// Environment variable name for the HS256 signing secret.
///
/// Deliberately allowed to be unset: challenge issuance still works, and
/// the verify path fails with `jwt_not_configured` until a secret is
/// provided. This keeps local nonce debugging possible without credentials.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the data directory holding the redb file.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

const DEFAULT_DATA_DIR: &str = "/data";
const DEFAULT_NONCE_TTL_SECS: i64 = 600;
const DEFAULT_TOKEN_TTL_SECS: i64 = 900;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub nonce_ttl: Duration,
    pub token_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var(JWT_SECRET_ENV).unwrap_or_default(),
            data_dir: env::var(DATA_DIR_ENV)
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
                .into(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            nonce_ttl: Duration::seconds(parse_secs("NONCE_TTL_SECS", DEFAULT_NONCE_TTL_SECS)),
            token_ttl: Duration::seconds(parse_secs("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)),
        }
    }

    /// Path of the redb database file inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("walletgate.redb")
    }
}

fn parse_secs(var: &str, default: i64) -> i64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_secs_falls_back_on_garbage() {
        // Unset and malformed both take the default
        assert_eq!(parse_secs("WALLETGATE_TEST_UNSET_VAR", 600), 600);
    }

    #[test]
    fn database_path_is_inside_data_dir() {
        let config = AppConfig {
            jwt_secret: String::new(),
            data_dir: PathBuf::from("/tmp/wg"),
            host: "0.0.0.0".to_string(),
            port: 8080,
            nonce_ttl: Duration::seconds(600),
            token_ttl: Duration::seconds(900),
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/wg/walletgate.redb"));
    }
}
