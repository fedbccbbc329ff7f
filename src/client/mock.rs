//! Mock query client for testing.
//!
//! Serves canned pages (or a canned error) without touching the network.

use std::sync::Mutex;

use super::QueryClient;
use crate::error::{MqliError, Result};
use crate::monitoring::{
    LabelDescriptor, LabelValue, MetricKind, PointData, PointDescriptor, QueryResponse,
    TimeInterval, TimeSeriesData, TimeSeriesDescriptor, TypedValueRecord, ValueType,
};
use crate::status::{normalize_error, StructuredError};
use async_trait::async_trait;

const PAGE_TOKEN_PREFIX: &str = "mock-page-";

/// A mock query client that returns predefined results.
#[derive(Debug)]
pub struct MockQueryClient {
    pages: Vec<QueryResponse>,
    error: Option<StructuredError>,
    queries: Mutex<Vec<String>>,
}

impl MockQueryClient {
    /// Creates a mock client that answers every query with a small sample result.
    pub fn new() -> Self {
        Self::with_pages(vec![sample_response()])
    }

    /// Creates a mock client that serves `pages` in order, linked by page tokens.
    pub fn with_pages(pages: Vec<QueryResponse>) -> Self {
        Self {
            pages,
            error: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock client that fails every query with `error`.
    pub fn failing(error: StructuredError) -> Self {
        Self {
            pages: Vec::new(),
            error: Some(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Returns every query text received so far, one entry per page request.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn page_index(page_token: Option<&str>) -> Result<usize> {
        match page_token {
            None => Ok(0),
            Some(token) => token
                .strip_prefix(PAGE_TOKEN_PREFIX)
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| MqliError::internal(format!("Unknown page token: {token}"))),
        }
    }
}

impl Default for MockQueryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn query_page(&self, query: &str, page_token: Option<&str>) -> Result<QueryResponse> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        if let Some(error) = &self.error {
            return Err(MqliError::query(normalize_error(error)));
        }

        let index = Self::page_index(page_token)?;
        if self.pages.is_empty() && index == 0 {
            return Ok(QueryResponse::default());
        }

        let mut page = self
            .pages
            .get(index)
            .cloned()
            .ok_or_else(|| MqliError::internal(format!("No mock page {index}")))?;
        page.next_page_token =
            (index + 1 < self.pages.len()).then(|| format!("{PAGE_TOKEN_PREFIX}{}", index + 1));
        Ok(page)
    }
}

/// A two-instance CPU utilization result.
pub fn sample_response() -> QueryResponse {
    let descriptor = TimeSeriesDescriptor {
        label_descriptors: vec![
            LabelDescriptor::new("resource.zone", ValueType::String),
            LabelDescriptor::new("metric.instance_name", ValueType::String),
        ],
        point_descriptors: vec![PointDescriptor::new(
            "value.utilization",
            ValueType::Double,
            MetricKind::Gauge,
        )],
    };

    let series = |zone: &str, instance: &str, values: &[(&str, f64)]| TimeSeriesData {
        label_values: vec![LabelValue::string(zone), LabelValue::string(instance)],
        point_data: values
            .iter()
            .map(|(ts, v)| PointData {
                values: vec![TypedValueRecord {
                    double_value: Some(*v),
                    ..Default::default()
                }],
                time_interval: TimeInterval::new(*ts, *ts),
            })
            .collect(),
    };

    QueryResponse {
        time_series_descriptor: descriptor,
        time_series_data: vec![
            series(
                "us-central1-a",
                "web-1",
                &[
                    ("2024-05-01T12:01:00Z", 0.42),
                    ("2024-05-01T12:00:00Z", 0.375),
                ],
            ),
            series("europe-west1-b", "web-2", &[("2024-05-01T12:01:00Z", 0.9)]),
        ],
        ..Default::default()
    }
}
