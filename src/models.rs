// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for automatic JSON handling and
//! OpenAPI documentation.
//!
//! The `wallet_type` field is a string at the API boundary and validated in
//! the core, so an unknown type yields the `invalid_wallet_type` error code
//! instead of a deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Role, WalletType};
use crate::storage::{UserRecord, WalletRecord};

// =============================================================================
// Challenge Models
// =============================================================================

/// Request for a login challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NonceRequest {
    /// Wallet type: `evm`, `stellar`, or `solana` (`ethereum` is accepted
    /// as an alias of `evm`).
    pub wallet_type: String,
    /// Wallet address in the type's native format.
    pub address: String,
}

/// An issued login challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeResponse {
    /// One-time nonce embedded in the message.
    pub nonce: String,
    /// The exact message the wallet must sign.
    pub message: String,
    /// When the nonce stops being redeemable.
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Verification Models
// =============================================================================

/// Request to verify a signed challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub wallet_type: String,
    pub address: String,
    /// Nonce from the challenge response.
    #[serde(default)]
    pub nonce: String,
    /// Signature over the challenge message, in the wallet type's encoding.
    #[serde(default)]
    pub signature: String,
    /// Optional explicit public key; must match the key the address encodes.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// HS256 bearer token.
    pub token: String,
    pub user: UserResponse,
    pub wallet: WalletResponse,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Public view of a wallet identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub wallet_type: WalletType,
    /// Canonical (normalized) address.
    pub address: String,
    pub last_login_at: DateTime<Utc>,
}

/// The identity behind a bearer token, as returned by `/v1/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub role: Role,
    pub wallet_type: WalletType,
    pub address: String,
}

impl From<&UserRecord> for UserResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<&WalletRecord> for WalletResponse {
    fn from(wallet: &WalletRecord) -> Self {
        Self {
            wallet_type: wallet.wallet_type,
            address: wallet.address.clone(),
            last_login_at: wallet.last_login_at,
        }
    }
}
