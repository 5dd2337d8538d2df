// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! # Authentication Module
//!
//! Challenge-response wallet authentication.
//!
//! ## Auth Flow
//!
//! 1. Client requests a challenge for a `(wallet_type, address)` pair
//! 2. Server issues a one-time nonce and the canonical message to sign
//! 3. Client signs the message with the wallet's key and submits the
//!    signature together with the nonce
//! 4. Server verifies the signature, atomically consumes the nonce,
//!    resolves-or-creates the user, and issues an HS256 bearer token
//!
//! ## Security
//!
//! - Nonces are single-use and expire; consumption is atomic, so a nonce
//!   can never authenticate two requests
//! - Signature verification happens before consumption, so a bad
//!   signature never burns a nonce
//! - Tokens are stateless HS256 JWTs; clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod message;
pub mod roles;
pub mod service;
pub mod signature;
pub mod wallet;

pub use claims::TokenClaims;
pub use error::AuthError;
pub use extractor::Auth;
pub use roles::Role;
pub use service::{AuthService, Challenge, LoginOutcome};
pub use wallet::WalletType;
