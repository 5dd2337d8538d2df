// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalletGate Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use walletgate::api::router;
use walletgate::config::AppConfig;
use walletgate::state::AppState;
use walletgate::storage::AuthDatabase;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();
    if config.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; logins will fail with jwt_not_configured");
    }

    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");
    let db = AuthDatabase::open(&config.database_path()).expect("Failed to open auth database");

    let state = AppState::new(Arc::new(db), &config);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("WalletGate listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
