//! HTTP handler for the signal gate
//!
//! Transport wiring only: deserializes the body into a raw request value,
//! invokes the evaluator, serializes the response. No contract logic lives
//! here — a malformed request still receives a well-formed ERROR response
//! with HTTP 200, because contract failure is a contract outcome, not a
//! transport failure.
//!
//! Routes:
//! - `POST /gate/v3/evaluate` - evaluate a v3 request
//! - `POST /gate/v2/evaluate` - legacy adapter route (v2 batch shape)
//! - `GET /health` - health check
//! - `GET /metrics` - Prometheus metrics

pub mod routes;

pub use routes::{create_router, HandlerState, HealthResponse, HealthStatus};
