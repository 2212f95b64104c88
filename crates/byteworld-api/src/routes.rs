//! Route table and handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use byteworld_core::{AddressFamily, AsnRecord, PrefixRecord, RegistryStats, ServiceRecord};
use byteworld_metrics::{RegistryMetrics, CONTENT_TYPE};
use byteworld_registry::LookupService;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Paths served by [`router`], as listed by `GET /`.
pub const ENDPOINTS: &[&str] = &[
    "/asn/{asn}",
    "/prefix/{family}/{prefix}",
    "/ipv4/{prefix}",
    "/ipv6/{prefix}",
    "/services/{type}",
    "/stats",
    "/metrics",
];

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Queries against the published registry.
    pub lookup: LookupService,
    /// Request and registry metrics.
    pub metrics: Arc<RegistryMetrics>,
}

impl AppState {
    /// Creates handler state.
    #[must_use]
    pub const fn new(lookup: LookupService, metrics: Arc<RegistryMetrics>) -> Self {
        Self { lookup, metrics }
    }
}

/// Builds the lookup API router.
///
/// Prefix parameters are captured to the end of the path, so a prefix may be
/// sent either percent-encoded (`192.0.2.0%2F24`) or with a literal slash.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/asn/:asn", get(asn))
        .route("/prefix/:family/*prefix", get(prefix))
        .route("/ipv4/*prefix", get(ipv4))
        .route("/ipv6/*prefix", get(ipv6))
        .route("/services/:category", get(services))
        .route("/stats", get(stats))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    state.metrics.record_request("root");
    Json(json!({
        "message": "Welcome to the Byte World Registry API",
        "endpoints": ENDPOINTS,
    }))
}

async fn asn(
    State(state): State<AppState>,
    Path(asn): Path<String>,
) -> Result<Json<AsnRecord>, ApiError> {
    state.metrics.record_request("asn");
    Ok(Json(state.lookup.asn(&asn)?))
}

async fn prefix(
    State(state): State<AppState>,
    Path((family, prefix)): Path<(String, String)>,
) -> Result<Json<PrefixRecord>, ApiError> {
    state.metrics.record_request("prefix");
    Ok(Json(state.lookup.prefix(&family, captured(&prefix))?))
}

async fn ipv4(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<PrefixRecord>, ApiError> {
    state.metrics.record_request("ipv4");
    Ok(Json(state.lookup.prefix_in(AddressFamily::V4, captured(&prefix))?))
}

async fn ipv6(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<PrefixRecord>, ApiError> {
    state.metrics.record_request("ipv6");
    Ok(Json(state.lookup.prefix_in(AddressFamily::V6, captured(&prefix))?))
}

async fn services(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ServiceRecord>>, ApiError> {
    state.metrics.record_request("services");
    Ok(Json(state.lookup.services(&category)?))
}

async fn stats(State(state): State<AppState>) -> Result<Json<RegistryStats>, ApiError> {
    state.metrics.record_request("stats");
    Ok(Json(state.lookup.stats()?))
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.metrics.record_request("metrics");
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}

/// Strips the separator a catch-all segment may start with.
fn captured(prefix: &str) -> &str {
    prefix.strip_prefix('/').unwrap_or(prefix)
}
