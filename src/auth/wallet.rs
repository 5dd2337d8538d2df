// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Wallet types and address normalization.
//!
//! Every address entering the system is canonicalized here before it is
//! used as a storage key or compared against a recovered signer. The rules
//! are per wallet type:
//!
//! - `evm`: `0x` + 40 hex characters, folded to lowercase
//! - `stellar`: strkey G-address (base32, version byte, CRC16 checksum),
//!   canonical form is uppercase
//! - `solana`: base58 string decoding to a 32-byte ed25519 public key,
//!   kept verbatim (base58 is case-sensitive)
//!
//! Normalization is pure and idempotent: feeding a normalized address back
//! in yields the same string.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AuthError;

/// Supported wallet signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    /// Ethereum-compatible wallets (secp256k1, EIP-191 personal sign)
    Evm,
    /// Stellar wallets (ed25519, strkey G-address)
    Stellar,
    /// Solana wallets (ed25519, base58 address)
    Solana,
}

impl WalletType {
    /// Parse a wallet type from its wire name (case-insensitive).
    pub fn from_str(s: &str) -> Option<WalletType> {
        match s.trim().to_lowercase().as_str() {
            "evm" | "ethereum" => Some(WalletType::Evm),
            "stellar" => Some(WalletType::Stellar),
            "solana" => Some(WalletType::Solana),
            _ => None,
        }
    }
}

impl std::fmt::Display for WalletType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletType::Evm => write!(f, "evm"),
            WalletType::Stellar => write!(f, "stellar"),
            WalletType::Solana => write!(f, "solana"),
        }
    }
}

/// Parse and validate a wallet type from a request field.
pub fn normalize_wallet_type(raw: &str) -> Result<WalletType, AuthError> {
    WalletType::from_str(raw).ok_or(AuthError::InvalidWalletType)
}

/// Canonicalize a raw address for the given wallet type.
///
/// The returned string is the comparable form used everywhere downstream:
/// storage keys, recovered-signer comparison, and token claims.
pub fn normalize_address(wallet_type: WalletType, raw: &str) -> Result<String, AuthError> {
    let addr = raw.trim();
    if addr.is_empty() {
        return Err(AuthError::InvalidAddress);
    }

    match wallet_type {
        WalletType::Evm => {
            if !addr.starts_with("0x") && !addr.starts_with("0X") {
                return Err(AuthError::InvalidAddress);
            }
            if addr.len() != 42 {
                return Err(AuthError::InvalidAddress);
            }
            hex::decode(&addr[2..]).map_err(|_| AuthError::InvalidAddress)?;
            Ok(addr.to_lowercase())
        }
        WalletType::Stellar => {
            let upper = addr.to_uppercase();
            decode_stellar_address(&upper)?;
            Ok(upper)
        }
        WalletType::Solana => {
            let decoded = bs58::decode(addr)
                .into_vec()
                .map_err(|_| AuthError::InvalidAddress)?;
            if decoded.len() != 32 {
                return Err(AuthError::InvalidAddress);
            }
            Ok(addr.to_string())
        }
    }
}

/// Strkey version byte for ed25519 public keys ('G' addresses).
const STELLAR_VERSION_ED25519: u8 = 6 << 3;

/// Decode a Stellar G-address into its raw ed25519 public key.
///
/// Strkey layout: base32(version byte || 32 key bytes || CRC16-XModem),
/// RFC 4648 alphabet without padding.
pub fn decode_stellar_address(address: &str) -> Result<[u8; 32], AuthError> {
    if !address.starts_with('G') {
        return Err(AuthError::InvalidAddress);
    }

    let decoded = base32::decode(base32::Alphabet::Rfc4648 { padding: false }, address)
        .ok_or(AuthError::InvalidAddress)?;

    // 1 version byte + 32 key bytes + 2 checksum bytes
    if decoded.len() != 35 {
        return Err(AuthError::InvalidAddress);
    }
    if decoded[0] != STELLAR_VERSION_ED25519 {
        return Err(AuthError::InvalidAddress);
    }

    let payload = &decoded[..33];
    let checksum = &decoded[33..35];
    if checksum != crc16_xmodem(payload) {
        return Err(AuthError::InvalidAddress);
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&decoded[1..33]);
    Ok(key)
}

/// CRC16-XModem over the strkey payload, little-endian on the wire.
fn crc16_xmodem(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    [(crc & 0xff) as u8, (crc >> 8) as u8]
}

/// Encode a raw ed25519 public key as a Stellar G-address.
///
/// Used when a client supplies explicit public key material so it can be
/// compared against the normalized address.
pub fn encode_stellar_address(key: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(35);
    payload.push(STELLAR_VERSION_ED25519);
    payload.extend_from_slice(key);
    let checksum = crc16_xmodem(&payload);
    payload.extend_from_slice(&checksum);
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM_ADDR: &str = "0x1234567890ABCDEF1234567890abcdef12345678";
    const STELLAR_ADDR: &str = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
    const SOLANA_ADDR: &str = "11111111111111111111111111111112";

    #[test]
    fn wallet_type_from_str() {
        assert_eq!(WalletType::from_str("evm"), Some(WalletType::Evm));
        assert_eq!(WalletType::from_str("EVM"), Some(WalletType::Evm));
        assert_eq!(WalletType::from_str("stellar"), Some(WalletType::Stellar));
        assert_eq!(WalletType::from_str("solana"), Some(WalletType::Solana));
        assert_eq!(WalletType::from_str("bitcoin"), None);
        assert_eq!(WalletType::from_str(""), None);
    }

    #[test]
    fn evm_address_folds_to_lowercase() {
        let normalized = normalize_address(WalletType::Evm, EVM_ADDR).unwrap();
        assert_eq!(normalized, EVM_ADDR.to_lowercase());
    }

    #[test]
    fn evm_address_rejects_malformed() {
        assert!(normalize_address(WalletType::Evm, "1234").is_err());
        assert!(normalize_address(WalletType::Evm, "0x1234").is_err());
        // Right length, non-hex characters
        assert!(normalize_address(
            WalletType::Evm,
            "0xZZ34567890abcdef1234567890abcdef12345678"
        )
        .is_err());
    }

    #[test]
    fn stellar_address_uppercased_and_checksummed() {
        let normalized = normalize_address(WalletType::Stellar, &STELLAR_ADDR.to_lowercase()).unwrap();
        assert_eq!(normalized, STELLAR_ADDR);

        // Corrupt the checksum by swapping the last character
        let mut corrupted = STELLAR_ADDR.to_string();
        corrupted.pop();
        corrupted.push('A');
        assert!(normalize_address(WalletType::Stellar, &corrupted).is_err());
    }

    #[test]
    fn stellar_address_rejects_wrong_prefix() {
        let seed = "SAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7";
        assert!(normalize_address(WalletType::Stellar, seed).is_err());
    }

    #[test]
    fn solana_address_kept_verbatim() {
        let normalized = normalize_address(WalletType::Solana, SOLANA_ADDR).unwrap();
        assert_eq!(normalized, SOLANA_ADDR);
    }

    #[test]
    fn solana_address_rejects_wrong_length() {
        assert!(normalize_address(WalletType::Solana, "111111").is_err());
        assert!(normalize_address(WalletType::Solana, "not-base58-0OIl").is_err());
    }

    #[test]
    fn normalization_is_idempotent() {
        for (wt, raw) in [
            (WalletType::Evm, EVM_ADDR),
            (WalletType::Stellar, STELLAR_ADDR),
            (WalletType::Solana, SOLANA_ADDR),
        ] {
            let once = normalize_address(wt, raw).unwrap();
            let twice = normalize_address(wt, &once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn stellar_encode_decode_round_trip() {
        let key = decode_stellar_address(STELLAR_ADDR).unwrap();
        assert_eq!(encode_stellar_address(&key), STELLAR_ADDR);
    }

    #[test]
    fn empty_address_rejected_for_all_types() {
        for wt in [WalletType::Evm, WalletType::Stellar, WalletType::Solana] {
            assert!(normalize_address(wt, "").is_err());
            assert!(normalize_address(wt, "   ").is_err());
        }
    }
}
