//! HTTP server for the browser client
//!
//! # Endpoints
//! - `GET /calculateEAR?apr=&n=` - effective annual rate
//! - `GET /calculateAPR?ear=&n=` - nominal annual rate
//! - `POST /calculateTimeValue` - FV, PV, RATE, NPER or PMT
//! - `POST /table` - acknowledge a grid upload
//! - `GET /health` - liveness check

mod config;

pub use config::{ServerConfig, DEFAULT_ALLOWED_ORIGIN};

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::Query,
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::{self, ApiError, AprResponse, EarResponse, TableReceipt, TimeValueResponse};

/// Attach the route name to rejected requests in the log
fn logged<T>(route: &str, result: Result<T, ApiError>) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(|e| {
        e.log(route);
        e
    })
}

async fn calculate_ear(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<EarResponse>, ApiError> {
    logged("/calculateEAR", api::ear_lookup(&params))
}

async fn calculate_apr(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<AprResponse>, ApiError> {
    logged("/calculateAPR", api::apr_lookup(&params))
}

async fn calculate_time_value(body: String) -> Result<Json<TimeValueResponse>, ApiError> {
    let result = api::parse_time_value_request(&body).and_then(|request| api::evaluate(&request));
    logged("/calculateTimeValue", result)
}

async fn table(body: String) -> Result<Json<TableReceipt>, ApiError> {
    logged("/table", api::receive_table(&body))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.origin_headers()?))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60)))
}

/// Build the API router with CORS for the configured origins
pub fn create_router(config: &ServerConfig) -> Result<Router> {
    Ok(Router::new()
        .route("/calculateEAR", get(calculate_ear))
        .route("/calculateAPR", get(calculate_apr))
        .route("/calculateTimeValue", post(calculate_time_value))
        .route("/table", post(table))
        .route("/health", get(health))
        .layer(cors_layer(config)?))
}

/// Bind and serve until the process is stopped
pub async fn serve(config: ServerConfig) -> Result<()> {
    let app = create_router(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!("listening on {}", config.addr);
    info!("allowed origins: {}", config.allowed_origins.join(", "));

    axum::serve(listener, app).await?;
    Ok(())
}
