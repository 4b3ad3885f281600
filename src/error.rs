//! Error types for impala-hook.
//!
//! This module defines domain-specific error types organized by functional area.

use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum ImpalaError {
    /// Connection record and URL errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Errors raised by the underlying client, passed through untouched
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Dataframe conversion errors
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors related to connection records and connection URLs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// A field required to build the connection URL is absent or empty
    #[error("Impala Connection Error: '{field}' is missing in the connection")]
    MissingField { field: String },

    /// The registry has no connection under this id
    #[error("The conn_id `{0}` isn't defined")]
    NotFound(String),

    /// Connection URI or JSON could not be parsed
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },
}

impl ConnectionError {
    pub(crate) fn missing(field: &str) -> Self {
        ConnectionError::MissingField {
            field: field.to_string(),
        }
    }
}

/// Errors produced by client implementations.
///
/// The hook never wraps or rewrites these; whatever the client returns is
/// what the caller sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Failed to establish connection to the server
    #[error("Failed to connect to {host}:{port}: {message}")]
    ConnectionFailed {
        host: String,
        port: u16,
        message: String,
    },

    /// Authentication failure
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Statement execution failed
    #[error("Query execution failed: {0}")]
    ExecutionFailed(String),

    /// Fetch called without a preceding result-producing execute
    #[error("No result set available: {0}")]
    NoResultSet(String),

    /// Commit or rollback failed
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Connection is closed
    #[error("Connection is closed")]
    ConnectionClosed,
}

/// Errors related to building tabular containers from fetched rows.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Failed to convert value
    #[error("Failed to convert value at row {row}, column {column}: {message}")]
    ValueConversionFailed {
        row: usize,
        column: usize,
        message: String,
    },

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Unknown dataframe backend name
    #[error("Unsupported dataframe type: {0}")]
    UnsupportedKind(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(String),
}

// Conversions from external error types
impl From<arrow::error::ArrowError> for ConversionError {
    fn from(err: arrow::error::ArrowError) -> Self {
        ConversionError::ArrowError(err.to_string())
    }
}

impl From<serde_json::Error> for ConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ConnectionError::ParseError(err.to_string())
    }
}
