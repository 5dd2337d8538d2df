// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Canonical login messages.
//!
//! The challenge text a wallet signs must be byte-for-byte deterministic,
//! so it is built here and nowhere else. Two variants exist: the current
//! format with a real newline, and a legacy format where early signing
//! tools pasted the literal `\n` escape instead. Verification accepts
//! either; the legacy format has no retirement date yet.

/// Current canonical login message for a nonce.
pub fn login_message(nonce: &str) -> String {
    format!("WalletGate login\nNonce: {nonce}")
}

/// Legacy login message: the line break rendered as a literal `\n`.
pub fn legacy_login_message(nonce: &str) -> String {
    format!("WalletGate login\\nNonce: {nonce}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_message_embeds_nonce_after_real_newline() {
        let msg = login_message("abc123");
        assert_eq!(msg, "WalletGate login\nNonce: abc123");
        assert!(msg.contains('\n'));
        assert!(!msg.contains("\\n"));
    }

    #[test]
    fn legacy_message_uses_escaped_newline() {
        let msg = legacy_login_message("abc123");
        assert_eq!(msg, "WalletGate login\\nNonce: abc123");
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn messages_are_deterministic() {
        assert_eq!(login_message("x"), login_message("x"));
        assert_eq!(legacy_login_message("x"), legacy_login_message("x"));
        assert_ne!(login_message("x"), legacy_login_message("x"));
    }
}
