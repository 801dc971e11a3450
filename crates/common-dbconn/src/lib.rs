//! Default connection parameters for the supported database engines.
//!
//! The defaults table is built once per process and never mutated. Connection
//! descriptors derived from it are plain values; nothing here opens a
//! connection.

mod descriptor;
mod engine;
mod params;

use thiserror::Error;

pub use descriptor::{ConnectionOverrides, ConnectionSpec};
pub use engine::DbEngine;
pub use params::{default_connection_params, defaults_for, supported_databases, ConnectionParams};

/// Placeholder written in place of secrets in anything returned or logged.
pub const REDACTED: &str = "***";

#[derive(Debug, Error)]
pub enum DbConnError {
    #[error("unsupported database type: {0}")]
    UnknownEngine(String),
    #[error("field `{field}` does not apply to {engine}")]
    FieldNotApplicable {
        engine: DbEngine,
        field: &'static str,
    },
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    #[error("failed to build connection url: {0}")]
    Url(#[from] url::ParseError),
}
