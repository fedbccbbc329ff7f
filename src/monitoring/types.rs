//! Time series response types for mqli.
//!
//! Mirrors the JSON shape of `timeSeries:query` responses. Decoding is
//! lenient: unknown enum strings and malformed scalar payloads never fail
//! the whole response.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{LabelValue, TypedValueRecord, ValueType};

/// Kind of a point field, which decides whether points carry an interval.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKind {
    #[default]
    Unspecified,
    Gauge,
    Delta,
    Cumulative,
    Other(String),
}

impl MetricKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "METRIC_KIND_UNSPECIFIED",
            Self::Gauge => "GAUGE",
            Self::Delta => "DELTA",
            Self::Cumulative => "CUMULATIVE",
            Self::Other(s) => s,
        }
    }

    /// Returns true for kinds whose points span a start..end interval.
    pub fn has_interval(&self) -> bool {
        matches!(self, Self::Delta | Self::Cumulative)
    }
}

impl From<String> for MetricKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | "METRIC_KIND_UNSPECIFIED" => Self::Unspecified,
            "GAUGE" => Self::Gauge,
            "DELTA" => Self::Delta,
            "CUMULATIVE" => Self::Cumulative,
            _ => Self::Other(s),
        }
    }
}

impl From<MetricKind> for String {
    fn from(k: MetricKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema of a query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesDescriptor {
    /// Label columns, e.g. `resource.zone`. May be empty.
    #[serde(default)]
    pub label_descriptors: Vec<LabelDescriptor>,

    /// Value columns, e.g. `value.utilization`.
    #[serde(default)]
    pub point_descriptors: Vec<PointDescriptor>,
}

/// Definition of a label column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    pub key: String,

    #[serde(default)]
    pub value_type: ValueType,
}

impl LabelDescriptor {
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            value_type,
        }
    }
}

/// Definition of a value column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDescriptor {
    pub key: String,

    #[serde(default)]
    pub value_type: ValueType,

    #[serde(default)]
    pub metric_kind: MetricKind,
}

impl PointDescriptor {
    pub fn new(key: impl Into<String>, value_type: ValueType, metric_kind: MetricKind) -> Self {
        Self {
            key: key.into(),
            value_type,
            metric_kind,
        }
    }
}

/// One label tuple and its history of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesData {
    /// Aligned with `TimeSeriesDescriptor::label_descriptors`.
    #[serde(default)]
    pub label_values: Vec<LabelValue>,

    #[serde(default)]
    pub point_data: Vec<PointData>,
}

/// One sample: an interval plus one value per point field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointData {
    /// Aligned with `TimeSeriesDescriptor::point_descriptors`.
    #[serde(default)]
    pub values: Vec<TypedValueRecord>,

    #[serde(default)]
    pub time_interval: TimeInterval,
}

/// RFC 3339 timestamps bounding a point. Gauge points have `start == end`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl TimeInterval {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
        }
    }
}

/// One page of a `timeSeries:query` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub time_series_descriptor: TimeSeriesDescriptor,

    #[serde(default)]
    pub time_series_data: Vec<TimeSeriesData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,

    /// Per-series failures reported alongside a successful response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partial_errors: Vec<serde_json::Value>,
}

impl QueryResponse {
    /// Returns the continuation token, treating an empty token as none.
    pub fn page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Request body for `timeSeries:query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest<'a> {
    pub query: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}
