//! Backend error normalization.
//!
//! Turns a structured API error into one display line. Detail parsing is
//! best effort: anything that does not decode falls back to the bare
//! `code`/`message` form.

use serde::{Deserialize, Serialize};

/// Error body returned by the API: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: StructuredError,
}

/// A backend error with an optional, not yet interpreted detail list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub message: String,

    /// Canonical status name, e.g. `INVALID_ARGUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl StructuredError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// One entry of the detail list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "@type", default)]
    pub type_url: String,

    #[serde(rename = "errorSummary", default)]
    pub summary: String,

    #[serde(default)]
    pub errors: Vec<ErrorDetailEntry>,
}

/// A single error inside a detail entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetailEntry {
    #[serde(default)]
    pub message: String,

    /// Position of the error in the query text. Not rendered.
    #[serde(default)]
    pub locator: Option<serde_json::Value>,
}

/// Outcome of interpreting the detail payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Details decoded; holds every nested error message in order.
    Detailed(Vec<String>),
    /// Details were malformed; only code and message are usable.
    Bare,
}

impl DetailOutcome {
    /// Interprets an error's detail payload. A missing payload is an empty list.
    pub fn from_error(err: &StructuredError) -> Self {
        let details = match &err.details {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(raw) => match Vec::<ErrorDetail>::deserialize(raw) {
                Ok(details) => details,
                Err(e) => {
                    tracing::debug!("Ignoring malformed error details: {}", e);
                    return Self::Bare;
                }
            },
        };

        Self::Detailed(
            details
                .into_iter()
                .flat_map(|d| d.errors)
                .map(|e| e.message)
                .collect(),
        )
    }
}

/// Renders a structured error as a single line.
///
/// `code: 400, message: "...", detail: "a, b"` when details decode,
/// otherwise `code: 400, message: "..."`.
pub fn normalize_error(err: &StructuredError) -> String {
    match DetailOutcome::from_error(err) {
        DetailOutcome::Detailed(messages) => format!(
            "code: {}, message: {:?}, detail: {:?}",
            err.code,
            err.message,
            messages.join(", ")
        ),
        DetailOutcome::Bare => format!("code: {}, message: {:?}", err.code, err.message),
    }
}
