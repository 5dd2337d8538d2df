// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Signature verification per wallet type.
//!
//! ## Schemes
//!
//! - **EVM**: EIP-191 personal sign. The signature is 65 hex-encoded bytes
//!   (r, s, v); the signer address is recovered from the keccak256 prehash
//!   and must equal the normalized input address. No public key is needed.
//! - **Stellar**: ed25519 over the raw message bytes. The verifying key is
//!   decoded from the strkey G-address; the signature is base64.
//! - **Solana**: ed25519 over the raw message bytes. The verifying key is
//!   the base58-decoded address; the signature is base58.
//!
//! Explicit public key material is optional for every scheme; when a
//! client supplies one it must decode to the same key the address encodes.
//!
//! Malformed signature encodings are verification failures, never panics.

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey as EcdsaVerifyingKey};
use sha3::{Digest, Keccak256};

use super::wallet::{decode_stellar_address, WalletType};
use super::AuthError;

/// Verify a signature over `message` for a normalized address.
///
/// Dispatches to the wallet-type-specific scheme. Returns
/// `AuthError::InvalidSignature` for any decode or verification failure.
pub fn verify_signature(
    wallet_type: WalletType,
    address: &str,
    message: &str,
    signature: &str,
    public_key: Option<&str>,
) -> Result<(), AuthError> {
    match wallet_type {
        WalletType::Evm => verify_evm(address, message, signature),
        WalletType::Stellar => verify_stellar(address, message, signature, public_key),
        WalletType::Solana => verify_solana(address, message, signature, public_key),
    }
}

/// Verify an EIP-191 (personal_sign) secp256k1 signature by recovery.
fn verify_evm(address: &str, message: &str, signature: &str) -> Result<(), AuthError> {
    let raw = signature.strip_prefix("0x").unwrap_or(signature);
    let sig_bytes = hex::decode(raw).map_err(|_| AuthError::InvalidSignature)?;
    if sig_bytes.len() != 65 {
        return Err(AuthError::InvalidSignature);
    }

    let message_hash = keccak256(eip191_message(message).as_bytes());
    let recovered = recover_evm_address(&message_hash, &sig_bytes)?;

    if recovered != address.to_lowercase() {
        return Err(AuthError::InvalidSignature);
    }
    Ok(())
}

/// Recover the signer address from a 65-byte (r, s, v) signature.
///
/// Accepts both `{0,1}` and `{27,28}` recovery id encodings.
fn recover_evm_address(message_hash: &[u8; 32], sig_bytes: &[u8]) -> Result<String, AuthError> {
    // Only the two EIP-191 v-byte encodings are valid
    let v = match sig_bytes[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return Err(AuthError::InvalidSignature),
    };
    let recovery_id = RecoveryId::try_from(v).map_err(|_| AuthError::InvalidSignature)?;
    let sig =
        EcdsaSignature::try_from(&sig_bytes[..64]).map_err(|_| AuthError::InvalidSignature)?;

    let verifying_key = EcdsaVerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| AuthError::InvalidSignature)?;

    // Address = last 20 bytes of keccak256(uncompressed pubkey minus the 0x04 tag)
    let point = verifying_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Ok(format!("0x{}", hex::encode(&hash[12..])))
}

/// Verify an ed25519 signature from a Stellar wallet.
fn verify_stellar(
    address: &str,
    message: &str,
    signature: &str,
    public_key: Option<&str>,
) -> Result<(), AuthError> {
    let address_key = decode_stellar_address(address).map_err(|_| AuthError::InvalidSignature)?;

    // An explicit public key must be the one the address encodes.
    if let Some(pk) = public_key.filter(|pk| !pk.is_empty()) {
        let supplied = decode_stellar_address(pk.trim().to_uppercase().as_str())
            .map_err(|_| AuthError::InvalidSignature)?;
        if supplied != address_key {
            return Err(AuthError::InvalidSignature);
        }
    }

    use base64::{engine::general_purpose::STANDARD, Engine};
    let sig_bytes = STANDARD
        .decode(signature.trim())
        .map_err(|_| AuthError::InvalidSignature)?;

    verify_ed25519(&address_key, message.as_bytes(), &sig_bytes)
}

/// Verify an ed25519 signature from a Solana wallet.
fn verify_solana(
    address: &str,
    message: &str,
    signature: &str,
    public_key: Option<&str>,
) -> Result<(), AuthError> {
    let key_bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| AuthError::InvalidSignature)?;
    let address_key: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| AuthError::InvalidSignature)?;

    if let Some(pk) = public_key.filter(|pk| !pk.is_empty()) {
        let supplied = bs58::decode(pk.trim())
            .into_vec()
            .map_err(|_| AuthError::InvalidSignature)?;
        if supplied != address_key {
            return Err(AuthError::InvalidSignature);
        }
    }

    let sig_bytes = bs58::decode(signature.trim())
        .into_vec()
        .map_err(|_| AuthError::InvalidSignature)?;

    verify_ed25519(&address_key, message.as_bytes(), &sig_bytes)
}

/// Shared ed25519 verification over raw message bytes.
fn verify_ed25519(key: &[u8; 32], message: &[u8], signature: &[u8]) -> Result<(), AuthError> {
    let verifying_key =
        VerifyingKey::from_bytes(key).map_err(|_| AuthError::InvalidSignature)?;
    let sig =
        Ed25519Signature::from_slice(signature).map_err(|_| AuthError::InvalidSignature)?;

    verifying_key
        .verify(message, &sig)
        .map_err(|_| AuthError::InvalidSignature)
}

/// EIP-191 envelope: `"\x19Ethereum Signed Message:\n" + len + message`.
fn eip191_message(message: &str) -> String {
    format!("\x19Ethereum Signed Message:\n{}{}", message.len(), message)
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
