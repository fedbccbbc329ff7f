//! Wire model for Cloud Monitoring query responses.

mod types;
mod value;

pub use types::{
    LabelDescriptor, MetricKind, PointData, PointDescriptor, QueryRequest, QueryResponse,
    TimeInterval, TimeSeriesData, TimeSeriesDescriptor,
};
pub use value::{Distribution, LabelValue, Money, TypedValue, TypedValueRecord, ValueType};
