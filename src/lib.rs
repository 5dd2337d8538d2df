// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! # WalletGate
//!
//! Challenge-response wallet authentication service. Clients prove
//! ownership of a wallet address by signing a one-time nonce; in exchange
//! they get a short-lived HS256 bearer token.
//!
//! ## Modules
//!
//! - [`auth`] — normalization, message formats, signature verification,
//!   token issuance, and the login orchestrator
//! - [`storage`] — embedded redb store for nonces, users, and wallets
//! - [`api`] — axum HTTP surface with OpenAPI docs
//! - [`config`] — environment-driven runtime configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod storage;
