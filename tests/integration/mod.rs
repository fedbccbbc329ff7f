//! Integration tests for mqli.

pub mod error_test;
pub mod live_test;
pub mod materialize_test;
pub mod shell_test;
