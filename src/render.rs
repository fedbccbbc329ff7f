//! Plain-text rendering of result tables.
//!
//! Renders an ASCII grid with left-aligned cells, or pretty JSON.

use crate::error::{MqliError, Result};
use crate::result::Table;
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::object::Segment;
use tabled::settings::style::HorizontalLine;
use tabled::settings::{Alignment, Style, Width};

/// Minimum width a truncated column keeps, including the ellipsis.
const MIN_COLUMN_WIDTH: usize = 4;

const ELLIPSIS: &str = "…";

/// Output format for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII grid.
    #[default]
    Table,
    /// Pretty-printed JSON of the header and rows.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: table or json")),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Cells wider than this are cut and end with `…`.
    pub max_column_width: Option<usize>,
}

/// Renders a table in the configured format. Output ends with a newline.
pub fn render(table: &Table, options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Table => Ok(render_grid(table, options.max_column_width)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(table)
                .map_err(|e| MqliError::internal(format!("Failed to encode result: {e}")))?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Renders the header and rows as a bordered grid.
///
/// Widths are measured in terminal columns, so wide characters line up.
pub fn render_grid(table: &Table, max_column_width: Option<usize>) -> String {
    if table.header.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(table.header.iter().cloned());
    for row in &table.rows {
        builder.push_record(row.columns.iter().cloned());
    }

    let mut grid = builder.build();
    grid.with(
        Style::ascii()
            .remove_horizontal()
            .horizontals([(1, HorizontalLine::inherit(Style::ascii()))]),
    );
    grid.modify(Segment::all(), Alignment::left());
    if let Some(width) = max_column_width {
        grid.modify(
            Segment::all(),
            Width::truncate(width.max(MIN_COLUMN_WIDTH)).suffix(ELLIPSIS),
        );
    }

    let mut out = grid.to_string();
    out.push('\n');
    out
}
