//! Error normalization tests against recorded API error bodies.

use mqli::status::{normalize_error, DetailOutcome, ErrorEnvelope, StructuredError};
use serde_json::json;

const QUERY_ERROR: &str = include_str!("../fixtures/query_error.json");

#[test]
fn test_query_error_fixture() {
    let envelope: ErrorEnvelope = serde_json::from_str(QUERY_ERROR).unwrap();

    assert_eq!(
        normalize_error(&envelope.error),
        "code: 400, message: \"Request contains an invalid argument.\", \
         detail: \"Table 'gce_instanc' not found., Did you mean 'gce_instance'?\""
    );
}

#[test]
fn test_unrecognized_detail_shapes_degrade() {
    let shapes = [
        json!("just a string"),
        json!(42),
        json!({"errors": []}),
        json!([1, 2, 3]),
        json!([{"errors": [{"message": 5}]}]),
    ];

    for details in shapes {
        let err = StructuredError::new(500, "Internal error encountered.").with_details(details);
        assert_eq!(DetailOutcome::from_error(&err), DetailOutcome::Bare);
        assert_eq!(
            normalize_error(&err),
            "code: 500, message: \"Internal error encountered.\""
        );
    }
}

#[test]
fn test_details_with_unknown_fields_still_parse() {
    let err = StructuredError::new(400, "bad").with_details(json!([
        {"@type": "type.googleapis.com/google.rpc.BadRequest", "fieldViolations": [{"field": "query"}]},
        {"errors": [{"message": "a", "extra": true}]}
    ]));
    assert_eq!(
        normalize_error(&err),
        "code: 400, message: \"bad\", detail: \"a\""
    );
}
