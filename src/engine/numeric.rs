//! Numeric guard: structural bounds and finiteness checks
//!
//! Two iterative walks over an untyped JSON structure:
//!
//! - [`check_bounds`] enforces nesting depth and node-count limits before any
//!   expensive work (serialization, field validation) touches the value.
//! - [`check_finite`] rejects non-finite numeric leaves (NaN, ±Infinity)
//!   anywhere in the structure.
//!
//! Both are pure functions with no error recovery: a negative result is fatal
//! for the enclosing validation step. The walks are iterative (explicit work
//! stack) so a hostile deeply-nested value cannot exhaust the call stack
//! before the depth limit fires.

use serde_json::Value;

use crate::config::GateConfig;
use crate::contracts::{GateFailure, ReasonCode};

/// Enforce nesting depth and total node count limits.
///
/// Counts every scalar, sequence, and mapping as one node. Depth starts at 1
/// for the root value.
pub fn check_bounds(value: &Value, config: &GateConfig) -> Result<(), GateFailure> {
    let mut nodes = 0usize;
    let mut stack: Vec<(&Value, usize)> = vec![(value, 1)];

    while let Some((current, depth)) = stack.pop() {
        nodes += 1;
        if nodes > config.max_nodes {
            return Err(GateFailure::new(ReasonCode::TooLarge, "max_nodes"));
        }
        if depth > config.max_depth {
            return Err(GateFailure::new(ReasonCode::TooLarge, "max_depth"));
        }

        match current {
            Value::Array(items) => {
                for item in items {
                    stack.push((item, depth + 1));
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    stack.push((item, depth + 1));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Reject any non-finite numeric leaf in the structure.
///
/// Callers must run [`check_bounds`] first; this walk relies on the node
/// budget already having been enforced.
pub fn check_finite(value: &Value) -> Result<(), GateFailure> {
    let mut stack: Vec<&Value> = vec![value];

    while let Some(current) = stack.pop() {
        match current {
            Value::Number(n) => {
                if !number_is_finite(n) {
                    return Err(GateFailure::new(ReasonCode::BadNumber, "non-finite number"));
                }
            }
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(map) => stack.extend(map.values()),
            _ => {}
        }
    }

    Ok(())
}

/// Extract a finite f64 from a JSON value.
///
/// Returns `None` for anything that is not a finite number. Booleans are
/// never numbers here, even though some runtimes coerce them; that rule is
/// load-bearing and tested.
pub fn finite_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => {
            let f = n.as_f64()?;
            f.is_finite().then_some(f)
        }
        _ => None,
    }
}

fn number_is_finite(n: &serde_json::Number) -> bool {
    // Integer-backed numbers are always finite; float-backed ones must check.
    n.is_i64() || n.is_u64() || n.as_f64().map(f64::is_finite).unwrap_or(false)
}
