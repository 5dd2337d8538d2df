// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! # Persistent Storage
//!
//! Everything this service persists — nonces, users, wallet identities —
//! lives in a single embedded redb database. The store is the only shared
//! mutable resource in the process; the one-time-use guarantee for nonces
//! is enforced by its serialized write transactions, not by in-process
//! locks.

pub mod database;

pub use database::{
    AuthDatabase, NonceRecord, StorageError, StorageResult, UserRecord, WalletRecord,
};
