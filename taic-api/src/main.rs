use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod schema;
mod services;

use crate::config::AppConfig;
use taic_shared::clients::db::{create_pool, DbPool};
use taic_shared::middleware::{init_metrics, init_tracing, metrics_middleware};

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub metrics: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("taic-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;
    let metrics = init_metrics();

    let state = Arc::new(AppState { db, config, metrics });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/api/auth/register", post(routes::register::register))
        .route("/api/auth/login", post(routes::login::login))
        .route("/api/auth/challenge", post(routes::challenge::challenge))
        .route("/api/auth/verify", post(routes::verify::verify))
        .route("/api/auth/me", get(routes::me::me))
        .route("/api/user/staking", get(routes::staking::summary))
        .route("/api/user/staking/stake", post(routes::staking::stake))
        .route("/api/user/staking/unstake", post(routes::staking::unstake))
        .route("/api/admin/users", get(routes::admin::list_users))
        .route("/api/admin/stakes", get(routes::admin::list_stakes))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "taic-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
