pub mod handlers;
pub mod session;
pub mod types;
mod ws;

use crate::{
    Result,
    config::Config,
    keepalive::{KeepAlive, PingSchedule},
    model::PredictionService,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub fn router(service: Arc<PredictionService>) -> Router {
    let app_state = handlers::AppState { service };

    Router::new()
        .route("/", get(handlers::welcome))
        .route("/predict/", post(handlers::predict))
        .route("/predict", post(handlers::predict))
        .route("/ws/predict", get(handlers::ws_predict))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    // Load the model once; every handler shares this instance.
    let service = Arc::new(PredictionService::from_config(&config.model).await?);

    let app = router(service);

    let keepalive = match PingSchedule::from_config(&config.keepalive) {
        Some(schedule) => Some(KeepAlive::spawn(schedule)?),
        None => {
            info!("No keepalive URL configured, liveness pinger disabled");
            None
        }
    };

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(keepalive) = keepalive {
        keepalive.shutdown().await;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
