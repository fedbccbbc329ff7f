//! Typed value and timestamp encoding.
//!
//! Every function here is total: absent, unspecified, or unknown inputs
//! encode as an empty string.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::monitoring::{LabelValue, TypedValueRecord, ValueType};

/// Encodes a label value according to its declared type.
pub fn encode_label_value(value_type: &ValueType, value: Option<&LabelValue>) -> String {
    value
        .and_then(|v| v.typed(value_type))
        .map(|v| v.to_display_string())
        .unwrap_or_default()
}

/// Encodes a point value according to its declared type.
pub fn encode_point_value(value_type: &ValueType, value: Option<&TypedValueRecord>) -> String {
    value
        .and_then(|v| v.typed(value_type))
        .map(|v| v.to_display_string())
        .unwrap_or_default()
}

/// Re-renders an RFC 3339 timestamp in UTC with nanosecond precision.
///
/// Fixed-width output sorts lexicographically. Unparsable input is
/// returned as is.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Nanos, true),
        Err(_) => raw.to_string(),
    }
}
