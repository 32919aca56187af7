// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitrine_server::{build_router, AppState, ServerConfig};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(err) => {
                error!(%err, "failed to register SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(err) => {
                error!(%err, "failed to register SIGINT handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();
    init_tracing(config.log_json);

    let conn = match vitrine_store::open_store(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(db_path = %config.db_path.display(), %err, "failed to open store");
            std::process::exit(1);
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    info!(
        db_path = %config.db_path.display(),
        environment = ?config.environment,
        "vitrine-server starting"
    );

    let state = Arc::new(AppState::new(config, conn));
    let app = build_router(state);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%bind_addr, %err, "failed to bind");
            std::process::exit(1);
        }
    };
    info!("vitrine-server listening on {bind_addr}");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            wait_for_shutdown_signal().await;
            info!("shutdown signal received, draining");
        })
        .await
    {
        error!(%err, "server exited with error");
        std::process::exit(1);
    }
}
