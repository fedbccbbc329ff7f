//! Result materialization tests against recorded API responses.

use mqli::monitoring::QueryResponse;
use mqli::render::render_grid;
use mqli::result::{materialize, Table};
use pretty_assertions::assert_eq;

const CUMULATIVE_RESPONSE: &str = include_str!("../fixtures/cumulative_response.json");

fn decode() -> QueryResponse {
    serde_json::from_str(CUMULATIVE_RESPONSE).expect("fixture should decode")
}

#[test]
fn test_fixture_header() {
    let response = decode();
    let table = materialize(&response.time_series_descriptor, &[]);

    assert_eq!(
        table.header,
        vec![
            "project_id",
            "zone",
            "response_code",
            "cache_hit",
            "start_time",
            "end_time",
            "request_count",
            "latencies",
            "healthy",
        ]
    );
}

#[test]
fn test_fixture_rows() {
    let table = Table::from(&decode());
    let rows: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|r| r.columns.iter().map(String::as_str).collect())
        .collect();

    assert_eq!(
        rows,
        vec![
            vec![
                "demo-project",
                "us-central1-a",
                "200",
                "true",
                "2024-05-01T11:00:00.000000000Z",
                "2024-05-01T12:00:00.000000000Z",
                "1024",
                "12.5",
                "true",
            ],
            vec![
                "demo-project",
                "us-central1-a",
                "200",
                "true",
                "2024-05-01T10:00:00.000000000Z",
                "2024-05-01T11:00:00.123456000Z",
                "980",
                "",
                "false",
            ],
            vec![
                "demo-project",
                "europe-west1-b",
                "503",
                "false",
                "2024-05-01T11:00:00.000000000Z",
                "2024-05-01T12:00:00.000000000Z",
                "7",
                "301.25",
                "",
            ],
        ]
    );
}

#[test]
fn test_every_row_matches_header_width() {
    let table = Table::from(&decode());
    assert!(!table.rows.is_empty());
    for row in &table.rows {
        assert_eq!(row.columns.len(), table.header.len());
    }
}

#[test]
fn test_fixture_renders_as_grid() {
    let table = Table::from(&decode());
    let grid = render_grid(&table, None);
    let lines: Vec<&str> = grid.lines().collect();

    // border, header, border, three rows, border
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("| project_id   | zone           |"));
    let width = lines[0].chars().count();
    assert!(lines.iter().all(|l| l.chars().count() == width));
}
