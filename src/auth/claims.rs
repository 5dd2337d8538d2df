// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Bearer token claims and HS256 issuance.
//!
//! Tokens are stateless: nothing is persisted at issuance and verification
//! is by signature alone. The signing secret is loaded once at startup and
//! immutable for the life of the process.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::storage::{UserRecord, WalletRecord};

use super::roles::Role;
use super::wallet::WalletType;
use super::AuthError;

/// Clock skew tolerance when validating tokens (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Claims carried by an issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id
    pub sub: String,
    pub role: Role,
    /// Wallet identity the login was proven with
    pub wallet_type: WalletType,
    pub address: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Sign a short-lived bearer token for a freshly authenticated identity.
pub fn issue_token(
    secret: &str,
    user: &UserRecord,
    wallet: &WalletRecord,
    ttl: Duration,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::TokenIssue("signing secret is empty".to_string()));
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user.id.to_string(),
        role: user.role,
        wallet_type: wallet.wallet_type,
        address: wallet.address.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenIssue(e.to_string()))
}

/// Verify a bearer token and return its claims.
///
/// Used by the `/me` path; any downstream service holding the same secret
/// can do the equivalent on its side.
pub fn decode_token(secret: &str, token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.validate_aud = false;

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}
