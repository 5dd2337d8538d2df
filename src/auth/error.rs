// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Authentication errors.
//!
//! The error taxonomy follows three tiers: validation errors (malformed
//! wallet type, address, or request shape) reject before any storage
//! access; authentication errors (bad signature, dead nonce) reject after
//! minimal storage interaction; infrastructure errors (storage down,
//! missing signing secret) surface as service-unavailable-class failures
//! so clients know a retry with the same input may later succeed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Authentication error type surfaced by the challenge and verify paths.
#[derive(Debug)]
pub enum AuthError {
    /// Wallet type is not in the supported enumeration
    InvalidWalletType,
    /// Address is malformed for its wallet type
    InvalidAddress,
    /// Nonce or signature missing from the verify request
    MissingCredentials,
    /// Signature failed verification under both message formats
    InvalidSignature,
    /// Nonce is unknown, already consumed, or past its expiry
    InvalidOrExpiredNonce,
    /// Persistent store failure
    Storage(StorageError),
    /// Bearer token could not be signed
    TokenIssue(String),
    /// Signing secret is not configured; the verify path is unreachable
    JwtNotConfigured,
    /// No authorization header present
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    InvalidAuthHeader,
    /// Bearer token is malformed, expired, or carries a bad signature
    InvalidToken,
    /// Token subject no longer resolves to a user
    UnknownUser,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Transport-agnostic error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidWalletType => "invalid_wallet_type",
            AuthError::InvalidAddress => "invalid_address",
            AuthError::MissingCredentials => "missing_nonce_or_signature",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidOrExpiredNonce => "invalid_or_expired_nonce",
            AuthError::Storage(_) => "storage_error",
            AuthError::TokenIssue(_) => "token_issue_failed",
            AuthError::JwtNotConfigured => "jwt_not_configured",
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UnknownUser => "unknown_user",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidWalletType
            | AuthError::InvalidAddress
            | AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidSignature
            | AuthError::InvalidOrExpiredNonce
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
            AuthError::Storage(_) | AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::JwtNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidWalletType => write!(f, "Unsupported wallet type"),
            AuthError::InvalidAddress => write!(f, "Address is malformed for this wallet type"),
            AuthError::MissingCredentials => write!(f, "Nonce and signature are required"),
            AuthError::InvalidSignature => write!(f, "Signature verification failed"),
            AuthError::InvalidOrExpiredNonce => {
                write!(f, "Nonce is invalid, consumed, or expired")
            }
            AuthError::Storage(e) => write!(f, "Storage failure: {e}"),
            AuthError::TokenIssue(msg) => write!(f, "Failed to issue token: {msg}"),
            AuthError::JwtNotConfigured => write!(f, "Signing secret is not configured"),
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken => write!(f, "Bearer token is invalid or expired"),
            AuthError::UnknownUser => write!(f, "Token subject does not resolve to a user"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn validation_errors_are_400() {
        assert_eq!(AuthError::InvalidWalletType.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidAddress.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::MissingCredentials.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn authentication_errors_are_401() {
        assert_eq!(AuthError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidOrExpiredNonce.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn infrastructure_errors_are_5xx() {
        assert_eq!(
            AuthError::JwtNotConfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::TokenIssue("empty secret".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn response_body_carries_error_code() {
        let response = AuthError::InvalidOrExpiredNonce.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "invalid_or_expired_nonce");
    }
}
