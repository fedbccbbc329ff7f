//! End-to-end shell tests with a mock query client.

use mqli::client::MockQueryClient;
use mqli::monitoring::QueryResponse;
use mqli::render::{OutputFormat, RenderOptions};
use mqli::shell::{Shell, ShellOptions, CONTINUATION_PROMPT, PROMPT};
use mqli::status::StructuredError;
use serde_json::json;
use tokio::io::BufReader;

fn run_output(shell: Shell<'_, Vec<u8>>) -> String {
    String::from_utf8(shell.into_output()).expect("shell output is utf-8")
}

#[tokio::test]
async fn test_session_with_continuation_and_quit() {
    let client = MockQueryClient::new();
    let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

    let input = tokio_test::io::Builder::new()
        .read(b"fetch gce_instance \\\n")
        .read(b"  | metric 'compute.googleapis.com/instance/cpu/utilization'\n")
        .read(b"\n")
        .read(b"QUIT\n")
        .build();
    shell.run(BufReader::new(input)).await.unwrap();

    assert_eq!(
        client.queries(),
        vec!["fetch gce_instance | metric 'compute.googleapis.com/instance/cpu/utilization'"]
    );

    let out = run_output(shell);
    assert!(out.starts_with(PROMPT));
    assert!(out.contains(CONTINUATION_PROMPT));
    assert!(out.contains("| zone           | instance_name | time"));
    assert!(out.contains("| us-central1-a  | web-1         | 2024-05-01T12:01:00.000000000Z | 0.42        |"));
    assert!(out.contains("3 points in result\n\n"));
    assert!(out.ends_with("Bye\n"));
}

#[tokio::test]
async fn test_errors_do_not_end_session() {
    let error = StructuredError::new(400, "Request contains an invalid argument.").with_details(
        json!([{"errors": [{"message": "Line 1, column 7: unknown table"}]}]),
    );
    let client = MockQueryClient::failing(error);
    let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

    let input: &[u8] = b"fetch nope\nfetch again\n";
    shell.run(input).await.unwrap();

    assert_eq!(client.queries().len(), 2);
    let out = run_output(shell);
    let expected = "ERROR: code: 400, message: \"Request contains an invalid argument.\", \
                    detail: \"Line 1, column 7: unknown table\"\n";
    assert_eq!(out.matches(expected).count(), 2);
    assert!(out.ends_with("Bye\n"));
}

#[tokio::test]
async fn test_empty_result_message() {
    let client = MockQueryClient::with_pages(vec![QueryResponse::default()]);
    let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

    let input: &[u8] = b"fetch gce_instance | within 1s\nexit\n";
    shell.run(input).await.unwrap();

    let out = run_output(shell);
    assert_eq!(
        out,
        format!("{PROMPT}Empty result\n\n{PROMPT}Bye\n")
    );
}

#[tokio::test]
async fn test_paged_result_is_one_table() {
    let sample = mqli::client::MockQueryClient::new();
    let page = mqli::client::query_all(&sample, "fetch", 1).await.unwrap();
    let client = MockQueryClient::with_pages(vec![page.clone(), page]);

    let options = ShellOptions {
        render: RenderOptions {
            format: OutputFormat::Table,
            max_column_width: Some(8),
        },
        ..Default::default()
    };
    let mut shell = Shell::new(&client, Vec::new(), options);
    assert!(shell.execute("fetch gce_instance").await.unwrap());

    let out = run_output(shell);
    assert!(out.contains("6 points in result"));
    assert!(out.contains("| us-cent… |"));
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_end_session() {
    let client = MockQueryClient::new();
    let mut shell = Shell::new(&client, Vec::new(), ShellOptions::default());

    let input: &[u8] = b"fetch \xff\nfetch gce_instance\nexit\n";
    shell.run(input).await.unwrap();

    assert_eq!(
        client.queries(),
        vec!["fetch \u{fffd}".to_string(), "fetch gce_instance".to_string()]
    );
    assert!(run_output(shell).ends_with("Bye\n"));
}
