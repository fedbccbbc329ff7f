//! Header projection from a time series descriptor.

use crate::monitoring::TimeSeriesDescriptor;

/// Which descriptor fields a prefix rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Label,
    Point,
}

/// Display prefixes, tried in order. At most one is stripped per key.
const PREFIX_RULES: &[(&str, FieldKind)] = &[
    ("resource.", FieldKind::Label),
    ("metric.", FieldKind::Label),
    ("value.", FieldKind::Point),
];

/// Strips the first matching display prefix for `kind` from `key`.
pub fn normalize_key(kind: FieldKind, key: &str) -> &str {
    PREFIX_RULES
        .iter()
        .filter(|(_, applies_to)| *applies_to == kind)
        .find_map(|(prefix, _)| key.strip_prefix(prefix))
        .unwrap_or(key)
}

/// Shape of the time columns, decided once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeColumns {
    /// One `time` column holding the end time.
    Single,
    /// `start_time` and `end_time` columns.
    Interval,
}

impl TimeColumns {
    /// Uses the interval shape if any point field is DELTA or CUMULATIVE.
    pub fn for_descriptor(descriptor: &TimeSeriesDescriptor) -> Self {
        if descriptor
            .point_descriptors
            .iter()
            .any(|pd| pd.metric_kind.has_interval())
        {
            Self::Interval
        } else {
            Self::Single
        }
    }

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Single => &["time"],
            Self::Interval => &["start_time", "end_time"],
        }
    }

    pub fn count(&self) -> usize {
        self.names().len()
    }
}

/// Builds the table header: labels, then time columns, then values.
pub fn project_header(descriptor: &TimeSeriesDescriptor, time_columns: TimeColumns) -> Vec<String> {
    let labels = descriptor
        .label_descriptors
        .iter()
        .map(|ld| normalize_key(FieldKind::Label, &ld.key));
    let points = descriptor
        .point_descriptors
        .iter()
        .map(|pd| normalize_key(FieldKind::Point, &pd.key));

    labels
        .chain(time_columns.names().iter().copied())
        .chain(points)
        .map(String::from)
        .collect()
}
