// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Login orchestration: the two public auth operations.
//!
//! `issue_challenge` and `verify_and_login` compose the normalizer, the
//! message formatter, the signature verifier, the nonce store, the user
//! upsert, and the token issuer. The ordering inside `verify_and_login`
//! is fixed:
//!
//! 1. normalize wallet type and address
//! 2. require nonce and signature to be present
//! 3. verify the signature (current message, then legacy message)
//! 4. atomically consume the nonce
//! 5. resolve-or-create the user and wallet identity
//! 6. issue the bearer token
//!
//! Signature verification happens before nonce consumption so a bad
//! signature never burns a nonce; the client can retry with the same
//! challenge until it expires. If the upsert fails after consumption the
//! nonce is gone and the client must request a fresh challenge — that
//! trade-off is deliberate and logged, not retried.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::storage::{AuthDatabase, UserRecord, WalletRecord};

use super::claims::issue_token;
use super::message::{legacy_login_message, login_message};
use super::signature::verify_signature;
use super::wallet::{normalize_address, normalize_wallet_type};
use super::AuthError;

/// A challenge ready to be signed by the client.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub nonce: String,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// A completed login: the bearer token plus the resolved identity.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserRecord,
    pub wallet: WalletRecord,
}

/// Orchestrates challenge issuance and verification.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<AuthDatabase>,
    secret: String,
    nonce_ttl: Duration,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        db: Arc<AuthDatabase>,
        secret: String,
        nonce_ttl: Duration,
        token_ttl: Duration,
    ) -> Self {
        Self {
            db,
            secret,
            nonce_ttl,
            token_ttl,
        }
    }

    /// The shared signing secret, for token verification paths.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn database(&self) -> &AuthDatabase {
        &self.db
    }

    /// Issue a one-time challenge for a wallet identity.
    ///
    /// No user or identity side effects; only a nonce row is written.
    pub fn issue_challenge(
        &self,
        wallet_type: &str,
        address: &str,
    ) -> Result<Challenge, AuthError> {
        let wtype = normalize_wallet_type(wallet_type)?;
        let addr = normalize_address(wtype, address)?;

        let nonce = self.db.create_nonce(wtype, &addr, self.nonce_ttl)?;
        tracing::info!(
            wallet_type = %wtype,
            address = %addr,
            expires_at = %nonce.expires_at,
            "Issued login challenge"
        );

        Ok(Challenge {
            message: login_message(&nonce.token),
            nonce: nonce.token,
            expires_at: nonce.expires_at,
        })
    }

    /// Verify a signed challenge and log the wallet's owner in.
    pub fn verify_and_login(
        &self,
        wallet_type: &str,
        address: &str,
        nonce: &str,
        signature: &str,
        public_key: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::JwtNotConfigured);
        }

        let wtype = normalize_wallet_type(wallet_type)?;
        let addr = normalize_address(wtype, address)?;

        if nonce.is_empty() || signature.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        // Current format first, then the legacy escaped-newline format.
        // Checked before consumption so a bad signature leaves the nonce
        // redeemable.
        let messages = [login_message(nonce), legacy_login_message(nonce)];
        let signature_ok = messages
            .iter()
            .any(|msg| verify_signature(wtype, &addr, msg, signature, public_key).is_ok());
        if !signature_ok {
            tracing::warn!(wallet_type = %wtype, address = %addr, "Signature verification failed");
            return Err(AuthError::InvalidSignature);
        }

        let now = Utc::now();
        if !self.db.consume_nonce(wtype, &addr, nonce, now)? {
            tracing::warn!(wallet_type = %wtype, address = %addr, "Nonce invalid or expired");
            return Err(AuthError::InvalidOrExpiredNonce);
        }

        let public_key = public_key.filter(|pk| !pk.is_empty());
        let (user, wallet) = self
            .db
            .upsert_user_wallet(wtype, &addr, public_key, now)
            .map_err(|e| {
                // The nonce is already consumed at this point; the client
                // must request a fresh challenge.
                tracing::error!(error = %e, "User upsert failed after nonce consumption");
                AuthError::Storage(e)
            })?;

        let token = issue_token(&self.secret, &user, &wallet, self.token_ttl)?;

        tracing::info!(
            user_id = %user.id,
            wallet_type = %wtype,
            address = %addr,
            "Login succeeded"
        );

        Ok(LoginOutcome {
            token,
            user,
            wallet,
        })
    }
}
