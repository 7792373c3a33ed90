//! Signal Gate Contract Definitions
//!
//! This module defines the versioned contract for the signal gate: the
//! request/envelope shapes it accepts, the response shape it emits, and the
//! stable reason-code taxonomy both sides key on.
//!
//! # Design Principles
//!
//! - **Fail-closed**: any invalidity surfaces as `decision = ERROR` with
//!   `meta.fail_closed = true`, never as a best-effort guess.
//! - **Stateless**: each evaluation is independent; contract objects are
//!   created per call, consumed, and dropped.
//! - **Deterministic**: the response (including `context_hash`) is a pure
//!   function of the request and the immutable gate configuration.
//! - **Opaque payloads**: upstream `evidence`/`meta` are shape-validated,
//!   never interpreted.

pub mod reason_codes;
pub mod request;
pub mod response;

// Re-export core types
pub use reason_codes::{GateFailure, ReasonCode};
pub use request::{
    Decision, Request, SignalEnvelope, REQUEST_KEYS, REQUEST_REQUIRED_KEYS, SIGNAL_KEYS,
};
pub use response::{GateEvent, Response, ResponseMeta};
