// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a valid bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is TokenClaims
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::claims::{decode_token, TokenClaims};
use super::AuthError;
use crate::state::AppState;

/// Extractor for authenticated requests.
///
/// Validates the HS256 bearer token from the `Authorization` header against
/// the shared signing secret and yields the decoded claims. Only tokens
/// this service issued will verify.
pub struct Auth(pub TokenClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        if state.auth.secret().is_empty() {
            return Err(AuthError::JwtNotConfigured);
        }

        let claims = decode_token(state.auth.secret(), token)?;
        Ok(Auth(claims))
    }
}
