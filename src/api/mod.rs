// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{Role, WalletType},
    models::{
        ChallengeResponse, LoginResponse, MeResponse, NonceRequest, UserResponse, VerifyRequest,
        WalletResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/nonce", post(auth::request_nonce))
        .route("/auth/verify", post(auth::verify))
        .route("/auth/me", get(auth::me))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::request_nonce,
        auth::verify,
        auth::me,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            NonceRequest,
            ChallengeResponse,
            VerifyRequest,
            LoginResponse,
            UserResponse,
            WalletResponse,
            MeResponse,
            WalletType,
            Role,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Challenge-response wallet authentication"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
