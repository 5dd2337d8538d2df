// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::{
    auth::{Auth, AuthError},
    models::{
        ChallengeResponse, LoginResponse, MeResponse, NonceRequest, UserResponse, VerifyRequest,
        WalletResponse,
    },
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/auth/nonce",
    request_body = NonceRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Challenge issued", body = ChallengeResponse),
        (status = 400, description = "Unknown wallet type or malformed address")
    )
)]
pub async fn request_nonce(
    State(state): State<AppState>,
    Json(request): Json<NonceRequest>,
) -> Result<Json<ChallengeResponse>, AuthError> {
    let challenge = state
        .auth
        .issue_challenge(&request.wallet_type, &request.address)?;

    Ok(Json(ChallengeResponse {
        nonce: challenge.nonce,
        message: challenge.message,
        expires_at: challenge.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/auth/verify",
    request_body = VerifyRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Malformed input or missing credentials"),
        (status = 401, description = "Signature or nonce rejected"),
        (status = 503, description = "Signing secret not configured")
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let outcome = state.auth.verify_and_login(
        &request.wallet_type,
        &request.address,
        &request.nonce,
        &request.signature,
        request.public_key.as_deref(),
    )?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        user: UserResponse::from(&outcome.user),
        wallet: WalletResponse::from(&outcome.wallet),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Identity behind the token", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(
    Auth(claims): Auth,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AuthError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
    let user = state
        .auth
        .database()
        .get_user(user_id)?
        .ok_or(AuthError::UnknownUser)?;

    Ok(Json(MeResponse {
        id: user.id,
        role: user.role,
        wallet_type: claims.wallet_type,
        address: claims.address,
    }))
}
