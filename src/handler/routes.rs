//! Route definitions for the signal gate
//!
//! All routes return machine-readable JSON. Evaluation routes are total:
//! any JSON body yields a contract response. Only a non-JSON body or an
//! operational fault (metrics rendering) surfaces as an HTTP error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::compat;
use crate::engine::ContractEvaluator;
use crate::telemetry::{emit_gate_event, GateMetricsRegistry};

/// Handler state shared across all routes.
#[derive(Clone)]
pub struct HandlerState {
    /// The contract evaluator; immutable and shared.
    pub evaluator: Arc<ContractEvaluator>,
    /// Prometheus registry for out-of-band metrics.
    pub metrics: GateMetricsRegistry,
    /// Start time for uptime calculation.
    pub start_time: Instant,
}

impl HandlerState {
    pub fn new(evaluator: ContractEvaluator, metrics: GateMetricsRegistry) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            metrics,
            start_time: Instant::now(),
        }
    }
}

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub component: String,
    pub version: String,
    pub contract_version: u64,
    pub uptime_seconds: u64,
}

/// Create the router with all gate routes.
pub fn create_router(state: HandlerState) -> Router {
    Router::new()
        .route("/gate/v3/evaluate", post(evaluate_v3))
        .route("/gate/v2/evaluate", post(evaluate_v2))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Evaluate one request and record out-of-band telemetry for it.
fn evaluate_and_record(state: &HandlerState, raw: &Value) -> crate::contracts::Response {
    let start = Instant::now();
    let response = state.evaluator.evaluate(raw);
    let elapsed = start.elapsed();

    state
        .metrics
        .gate()
        .record_response(&response, elapsed.as_secs_f64());
    emit_gate_event(&response, elapsed.as_millis() as u64);

    response
}

async fn evaluate_v3(
    State(state): State<HandlerState>,
    Json(raw): Json<Value>,
) -> Json<crate::contracts::Response> {
    Json(evaluate_and_record(&state, &raw))
}

async fn evaluate_v2(
    State(state): State<HandlerState>,
    Json(legacy): Json<Value>,
) -> HttpResponse {
    match compat::adapt_request(&legacy) {
        Ok(raw) => {
            let response = evaluate_and_record(&state, &raw);
            Json(compat::adapt_response(&response)).into_response()
        }
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

async fn health(State(state): State<HandlerState>) -> Json<HealthResponse> {
    let config = state.evaluator.config();
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        component: config.component.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        contract_version: config.supported_version,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

async fn metrics(State(state): State<HandlerState>) -> HttpResponse {
    match state.metrics.render() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
