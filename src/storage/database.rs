// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Embedded auth database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `nonces`: composite key (wallet_type|address|token) → serialized NonceRecord
//! - `users`: user_id → serialized UserRecord
//! - `wallets`: composite key (wallet_type|address) → serialized WalletRecord
//!
//! ## Atomicity
//!
//! All coordination lives in redb's write transactions, which are
//! serialized. Nonce consumption is a conditional rewrite inside a single
//! write transaction, so concurrent consumers of the same token see
//! exactly one winner. A transaction dropped before `commit()` writes
//! nothing, so a cancelled request cannot half-consume a nonce.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Role, WalletType};

// =============================================================================
// Table Definitions
// =============================================================================

/// Nonce rows: composite key `wallet_type|address|token` → JSON bytes.
const NONCES: TableDefinition<&str, &[u8]> = TableDefinition::new("nonces");

/// User rows: user_id (UUID string) → JSON bytes.
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Wallet identity rows: composite key `wallet_type|address` → JSON bytes.
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Nonce token entropy in bytes (hex-encoded to 64 characters).
const NONCE_TOKEN_BYTES: usize = 32;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Records
// =============================================================================

/// A one-time login challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceRecord {
    /// Random token embedded in the message the wallet signs
    pub token: String,
    pub wallet_type: WalletType,
    /// Normalized address the challenge is bound to
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, on successful verification
    pub consumed_at: Option<DateTime<Utc>>,
}

/// A user identity. Created on first successful login, never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A wallet identity owned by a user. One user per (wallet_type, address).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub wallet_type: WalletType,
    pub address: String,
    /// Explicit public key material, when the client supplied any
    pub public_key: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

// =============================================================================
// Key Helpers
// =============================================================================

fn nonce_key(wallet_type: WalletType, address: &str, token: &str) -> String {
    format!("{wallet_type}|{address}|{token}")
}

fn wallet_key(wallet_type: WalletType, address: &str) -> String {
    format!("{wallet_type}|{address}")
}

/// Generate a fresh high-entropy nonce token (64 hex characters).
fn generate_token() -> String {
    let mut bytes = [0u8; NONCE_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// =============================================================================
// AuthDatabase
// =============================================================================

/// Embedded ACID database for nonces, users, and wallet identities.
pub struct AuthDatabase {
    db: Database,
}

impl AuthDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(NONCES)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(WALLETS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Nonces
    // =========================================================================

    /// Create and persist a fresh nonce for a normalized wallet identity.
    ///
    /// Earlier nonces for the same identity are left alone; they die by
    /// expiry or consumption.
    pub fn create_nonce(
        &self,
        wallet_type: WalletType,
        address: &str,
        ttl: Duration,
    ) -> StorageResult<NonceRecord> {
        let now = Utc::now();
        let record = NonceRecord {
            token: generate_token(),
            wallet_type,
            address: address.to_string(),
            created_at: now,
            expires_at: now + ttl,
            consumed_at: None,
        };
        let json = serde_json::to_vec(&record)?;
        let key = nonce_key(wallet_type, address, &record.token);

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(NONCES)?;
            table.insert(key.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(record)
    }

    /// Atomically consume a nonce.
    ///
    /// Within one write transaction: locate the row, require it unconsumed
    /// and unexpired, and rewrite it with `consumed_at` set. Returns
    /// `Ok(true)` for the single winner; `Ok(false)` when the nonce is
    /// unknown, already consumed, or expired. Never a read-then-write pair
    /// across transactions — that would reintroduce the replay race.
    pub fn consume_nonce(
        &self,
        wallet_type: WalletType,
        address: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<bool> {
        let key = nonce_key(wallet_type, address, token);

        let write_txn = self.db.begin_write()?;
        let consumed = {
            let mut table = write_txn.open_table(NONCES)?;

            let existing_bytes = match table.get(key.as_str())? {
                Some(value) => value.value().to_vec(),
                None => return Ok(false),
            };

            let mut record: NonceRecord = serde_json::from_slice(&existing_bytes)?;
            if record.consumed_at.is_some() || now >= record.expires_at {
                false
            } else {
                record.consumed_at = Some(now);
                let json = serde_json::to_vec(&record)?;
                table.insert(key.as_str(), json.as_slice())?;
                true
            }
        };

        if consumed {
            write_txn.commit()?;
        }
        Ok(consumed)
    }

    // =========================================================================
    // Users and wallet identities
    // =========================================================================

    /// Resolve-or-create the user owning a wallet identity, atomically.
    ///
    /// A single write transaction either finds the wallet row and returns
    /// its user (stamping `last_login_at` and any newly supplied public
    /// key), or creates both the user and the wallet row. All-or-nothing:
    /// a failure leaves no partial identity behind.
    pub fn upsert_user_wallet(
        &self,
        wallet_type: WalletType,
        address: &str,
        public_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> StorageResult<(UserRecord, WalletRecord)> {
        let wkey = wallet_key(wallet_type, address);

        let write_txn = self.db.begin_write()?;
        let result = {
            let mut wallets = write_txn.open_table(WALLETS)?;
            let mut users = write_txn.open_table(USERS)?;

            let existing = match wallets.get(wkey.as_str())? {
                Some(value) => Some(value.value().to_vec()),
                None => None,
            };

            match existing {
                Some(bytes) => {
                    let mut wallet: WalletRecord = serde_json::from_slice(&bytes)?;
                    let user_id = wallet.user_id.to_string();
                    let user_bytes = users
                        .get(user_id.as_str())?
                        .map(|v| v.value().to_vec())
                        .ok_or_else(|| StorageError::NotFound(format!("User {user_id}")))?;
                    let user: UserRecord = serde_json::from_slice(&user_bytes)?;

                    wallet.last_login_at = now;
                    if wallet.public_key.is_none() {
                        wallet.public_key = public_key.map(str::to_string);
                    }
                    let json = serde_json::to_vec(&wallet)?;
                    wallets.insert(wkey.as_str(), json.as_slice())?;

                    (user, wallet)
                }
                None => {
                    let user = UserRecord {
                        id: Uuid::new_v4(),
                        role: Role::default(),
                        created_at: now,
                    };
                    let wallet = WalletRecord {
                        wallet_type,
                        address: address.to_string(),
                        public_key: public_key.map(str::to_string),
                        user_id: user.id,
                        created_at: now,
                        last_login_at: now,
                    };

                    let user_json = serde_json::to_vec(&user)?;
                    let user_id = user.id.to_string();
                    users.insert(user_id.as_str(), user_json.as_slice())?;

                    let wallet_json = serde_json::to_vec(&wallet)?;
                    wallets.insert(wkey.as_str(), wallet_json.as_slice())?;

                    (user, wallet)
                }
            }
        };
        write_txn.commit()?;
        Ok(result)
    }

    /// Look up a user by id.
    pub fn get_user(&self, user_id: Uuid) -> StorageResult<Option<UserRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let key = user_id.to_string();
        match table.get(key.as_str())? {
            Some(value) => {
                let user: UserRecord = serde_json::from_slice(value.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Look up the wallet identity row for a normalized address.
    pub fn get_wallet(
        &self,
        wallet_type: WalletType,
        address: &str,
    ) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        let key = wallet_key(wallet_type, address);
        match table.get(key.as_str())? {
            Some(value) => {
                let wallet: WalletRecord = serde_json::from_slice(value.value())?;
                Ok(Some(wallet))
            }
            None => Ok(None),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn temp_db() -> (AuthDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = AuthDatabase::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    const ADDR: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn create_nonce_generates_unique_tokens() {
        let (db, _dir) = temp_db();
        let a = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();
        let b = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(a.token.len(), 64);
        assert!(a.expires_at > a.created_at);
        assert!(a.consumed_at.is_none());
    }

    #[test]
    fn consume_nonce_succeeds_once() {
        let (db, _dir) = temp_db();
        let nonce = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();

        let now = Utc::now();
        assert!(db.consume_nonce(WalletType::Evm, ADDR, &nonce.token, now).unwrap());
        // Second attempt sees the consumed flag
        assert!(!db.consume_nonce(WalletType::Evm, ADDR, &nonce.token, now).unwrap());
    }

    #[test]
    fn consume_nonce_rejects_unknown_token() {
        let (db, _dir) = temp_db();
        assert!(!db.consume_nonce(WalletType::Evm, ADDR, "no-such-token", Utc::now()).unwrap());
    }

    #[test]
    fn consume_nonce_respects_expiry_boundary() {
        let (db, _dir) = temp_db();
        let nonce = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();

        // Just before expiry: accepted
        let before = nonce.expires_at - Duration::seconds(1);
        assert!(db.consume_nonce(WalletType::Evm, ADDR, &nonce.token, before).unwrap());

        // A fresh nonce just after expiry: rejected
        let nonce = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();
        let after = nonce.expires_at + Duration::seconds(1);
        assert!(!db.consume_nonce(WalletType::Evm, ADDR, &nonce.token, after).unwrap());
    }

    #[test]
    fn consume_nonce_is_keyed_to_identity() {
        let (db, _dir) = temp_db();
        let nonce = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();

        // Same token, wrong wallet type or address
        let now = Utc::now();
        assert!(!db.consume_nonce(WalletType::Solana, ADDR, &nonce.token, now).unwrap());
        let other = "0x2222222222222222222222222222222222222222";
        assert!(!db.consume_nonce(WalletType::Evm, other, &nonce.token, now).unwrap());
        // Right identity still works
        assert!(db.consume_nonce(WalletType::Evm, ADDR, &nonce.token, now).unwrap());
    }

    #[test]
    fn concurrent_consumers_have_exactly_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(AuthDatabase::open(&dir.path().join("race.redb")).unwrap());
        let nonce = db.create_nonce(WalletType::Evm, ADDR, Duration::minutes(10)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                let token = nonce.token.clone();
                std::thread::spawn(move || {
                    db.consume_nonce(WalletType::Evm, ADDR, &token, Utc::now()).unwrap()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1, "exactly one concurrent consumer must win");
    }

    #[test]
    fn upsert_creates_then_resolves_same_user() {
        let (db, _dir) = temp_db();
        let now = Utc::now();

        let (user1, wallet1) = db.upsert_user_wallet(WalletType::Evm, ADDR, None, now).unwrap();
        assert_eq!(user1.role, Role::User);
        assert_eq!(wallet1.user_id, user1.id);
        assert_eq!(wallet1.address, ADDR);

        let later = now + Duration::minutes(5);
        let (user2, wallet2) = db
            .upsert_user_wallet(WalletType::Evm, ADDR, Some("pubkey"), later)
            .unwrap();
        assert_eq!(user2.id, user1.id);
        assert_eq!(wallet2.last_login_at, later);
        // Public key recorded on the repeat login since none was stored
        assert_eq!(wallet2.public_key.as_deref(), Some("pubkey"));
    }

    #[test]
    fn upsert_separates_wallet_types() {
        let (db, _dir) = temp_db();
        let now = Utc::now();

        let (evm_user, _) = db.upsert_user_wallet(WalletType::Evm, ADDR, None, now).unwrap();
        let (sol_user, _) = db
            .upsert_user_wallet(WalletType::Solana, "11111111111111111111111111111112", None, now)
            .unwrap();

        assert_ne!(evm_user.id, sol_user.id);
    }

    #[test]
    fn get_user_round_trips() {
        let (db, _dir) = temp_db();
        let (user, _) = db
            .upsert_user_wallet(WalletType::Evm, ADDR, None, Utc::now())
            .unwrap();

        let loaded = db.get_user(user.id).unwrap().unwrap();
        assert_eq!(loaded.id, user.id);
        assert_eq!(loaded.role, user.role);

        assert!(db.get_user(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn get_wallet_round_trips() {
        let (db, _dir) = temp_db();
        let (user, _) = db
            .upsert_user_wallet(WalletType::Evm, ADDR, Some("pk"), Utc::now())
            .unwrap();

        let wallet = db.get_wallet(WalletType::Evm, ADDR).unwrap().unwrap();
        assert_eq!(wallet.user_id, user.id);
        assert_eq!(wallet.public_key.as_deref(), Some("pk"));

        assert!(db.get_wallet(WalletType::Stellar, "GABC").unwrap().is_none());
    }
}
