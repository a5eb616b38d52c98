//! Success markers: the single pass/fail signal for a step.
//!
//! The body is decoded as JSON and one top-level string field is compared
//! against a literal. Nothing else in the response is inspected, so changes
//! to other fields (messages, payload shape) go unnoticed.

use serde_json::Value;
use std::fmt;

/// A field/value pair expected at the top level of a JSON response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessMarker {
    pub field: &'static str,
    pub value: &'static str,
}

impl SuccessMarker {
    pub const fn new(field: &'static str, value: &'static str) -> Self {
        Self { field, value }
    }

    /// `{"status": "healthy"}`
    pub const fn healthy() -> Self {
        Self::new("status", "healthy")
    }

    /// `{"database_status": "healthy"}`
    pub const fn database_healthy() -> Self {
        Self::new("database_status", "healthy")
    }

    /// `{"status": "success"}`
    pub const fn success() -> Self {
        Self::new("status", "success")
    }

    /// Checks `body` for this marker.
    pub fn check(&self, body: &str) -> Result<(), MarkerMismatch> {
        let json: Value = serde_json::from_str(body).map_err(|e| MarkerMismatch::InvalidJson {
            reason: e.to_string(),
        })?;

        match json.get(self.field) {
            Some(Value::String(found)) if found == self.value => Ok(()),
            Some(other) => Err(MarkerMismatch::WrongValue {
                field: self.field,
                expected: self.value,
                found: other.clone(),
            }),
            None => Err(MarkerMismatch::MissingField { field: self.field }),
        }
    }
}

impl fmt::Display for SuccessMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\": \"{}\"", self.field, self.value)
    }
}

/// Why a response body did not carry the expected marker.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkerMismatch {
    #[error("response is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("response has no '{field}' field")]
    MissingField { field: &'static str },

    #[error("expected '{field}' to be \"{expected}\", found {found}")]
    WrongValue {
        field: &'static str,
        expected: &'static str,
        found: Value,
    },
}
