//! mqli - An interactive shell for Monitoring Query Language.
//!
//! The library holds the result materializer and error normalizer, plus the
//! client, shell and rendering layers built around them.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod monitoring;
pub mod render;
pub mod result;
pub mod shell;
pub mod spinner;
pub mod status;
