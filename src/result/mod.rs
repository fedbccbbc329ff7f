//! Result materialization for mqli.
//!
//! Flattens a descriptor plus its time series into a header and string rows.
//! Materialization never fails; malformed fields become empty cells.

mod encode;
mod header;

pub use encode::{encode_label_value, encode_point_value, format_timestamp};
pub use header::{normalize_key, project_header, FieldKind, TimeColumns};

use serde::{Deserialize, Serialize};

use crate::monitoring::{QueryResponse, TimeSeriesData, TimeSeriesDescriptor};

/// A flattened query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// One output row. Always has exactly `header.len()` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<String>,
}

impl Table {
    /// Returns true if the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds a table from a descriptor and its series.
///
/// Rows follow input order: every point of the first series, then every
/// point of the next. Positions missing from a series or point encode as
/// empty strings and surplus positions are ignored.
pub fn materialize(descriptor: &TimeSeriesDescriptor, series: &[TimeSeriesData]) -> Table {
    let time_columns = TimeColumns::for_descriptor(descriptor);
    let header = project_header(descriptor, time_columns);
    let mut rows = Vec::new();

    for data in series {
        let labels: Vec<String> = descriptor
            .label_descriptors
            .iter()
            .enumerate()
            .map(|(i, ld)| encode_label_value(&ld.value_type, data.label_values.get(i)))
            .collect();

        for point in &data.point_data {
            let mut columns = Vec::with_capacity(header.len());
            columns.extend(labels.iter().cloned());

            let interval = &point.time_interval;
            if time_columns == TimeColumns::Interval {
                columns.push(format_timestamp(interval.start_time.as_deref()));
            }
            columns.push(format_timestamp(interval.end_time.as_deref()));

            columns.extend(
                descriptor
                    .point_descriptors
                    .iter()
                    .enumerate()
                    .map(|(i, pd)| encode_point_value(&pd.value_type, point.values.get(i))),
            );

            rows.push(Row { columns });
        }
    }

    Table { header, rows }
}

impl From<&QueryResponse> for Table {
    fn from(response: &QueryResponse) -> Self {
        materialize(&response.time_series_descriptor, &response.time_series_data)
    }
}
