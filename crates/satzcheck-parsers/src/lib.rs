//! satzcheck-parsers — Dependency parser backends.
//!
//! Implements the `DependencyParser` trait for an external HTTP parsing
//! service and for an in-process mock, so the evaluation pipeline can run
//! against a real German model or fully offline in tests.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_parser, load_config, load_config_from, ParserConfig};
pub use http::HttpParser;
pub use mock::MockParser;
