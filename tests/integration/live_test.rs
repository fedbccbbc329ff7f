//! Live query tests against the Monitoring API.
//!
//! Skipped unless INTEGRATION_TEST_PROJECT_ID is set. Credentials come from
//! the default token command (`gcloud auth print-access-token`).

use mqli::auth::TokenSource;
use mqli::client::{query_all, MonitoringClient};
use mqli::config::Config;
use mqli::result::Table;

const ENV_TEST_PROJECT_ID: &str = "INTEGRATION_TEST_PROJECT_ID";

async fn get_test_client() -> Option<MonitoringClient> {
    let project = std::env::var(ENV_TEST_PROJECT_ID).ok()?;
    let config = Config {
        project_id: Some(project),
        ..Default::default()
    };
    let token = TokenSource::from_config(&config).fetch().await.ok()?;
    MonitoringClient::new(&config, token).ok()
}

#[tokio::test]
async fn test_live_query_header() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: {ENV_TEST_PROJECT_ID} not set");
        return;
    };

    let response = query_all(
        &client,
        "fetch global::monitoring.googleapis.com/uptime_check/check_passed | within 10m",
        5,
    )
    .await
    .unwrap();
    let table = Table::from(&response);

    for row in &table.rows {
        assert_eq!(row.columns.len(), table.header.len());
    }
}

#[tokio::test]
async fn test_live_invalid_query_is_normalized() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: {ENV_TEST_PROJECT_ID} not set");
        return;
    };

    let err = query_all(&client, "fetch no_such_table", 1).await.unwrap_err();
    assert_eq!(err.category(), "Query Error");
    assert!(err.to_string().starts_with("code: 400"));
}
