// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::storage::AuthDatabase;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub fn new(db: Arc<AuthDatabase>, config: &AppConfig) -> Self {
        Self {
            auth: AuthService::new(
                db,
                config.jwt_secret.clone(),
                config.nonce_ttl,
                config.token_ttl,
            ),
        }
    }

    /// State backed by a fresh database in `dir`, for handler tests.
    #[cfg(test)]
    pub fn for_tests(dir: &std::path::Path, secret: &str) -> Self {
        let db = Arc::new(AuthDatabase::open(&dir.join("test.redb")).expect("open test db"));
        Self {
            auth: AuthService::new(
                db,
                secret.to_string(),
                chrono::Duration::minutes(10),
                chrono::Duration::minutes(15),
            ),
        }
    }
}
