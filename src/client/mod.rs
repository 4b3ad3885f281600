//! Client abstraction for the Impala network driver.
//!
//! The hook does not speak Impala's wire protocol. It hands [`ConnectArgs`] to
//! an [`ImpalaClient`] and drives the returned [`DbConnection`] and [`Cursor`]
//! through a DB-API shaped interface.
//!
//! # Architecture
//!
//! - [`ImpalaClient`] - the client constructor
//! - [`DbConnection`] - an open connection handle
//! - [`Cursor`] - statement execution and row fetching

use crate::error::ClientError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A fetched row.
pub type Row = Vec<Value>;

/// Keyword arguments passed to the client constructor.
#[derive(Clone, Default, PartialEq)]
pub struct ConnectArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub use_ssl: Option<bool>,
    pub auth_mechanism: Option<String>,
    /// Remaining extras, passed through untouched
    pub kwargs: BTreeMap<String, Value>,
}

impl ConnectArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split extras into the explicit `use_ssl` / `auth_mechanism` arguments
    /// and passthrough keyword arguments.
    ///
    /// Values that cannot be read as the explicit argument's type stay in
    /// `kwargs` for the client to judge.
    pub fn with_extras(mut self, extras: Map<String, Value>) -> Self {
        for (key, value) in extras {
            match key.as_str() {
                "use_ssl" => match as_bool(&value) {
                    Some(flag) => self.use_ssl = Some(flag),
                    None => {
                        self.kwargs.insert(key, value);
                    }
                },
                "auth_mechanism" => match value {
                    Value::String(mechanism) => self.auth_mechanism = Some(mechanism),
                    other => {
                        self.kwargs.insert(key, other);
                    }
                },
                _ => {
                    self.kwargs.insert(key, value);
                }
            }
        }
        self
    }
}

// Prevent password from being displayed in debug output
impl fmt::Debug for ConnectArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("use_ssl", &self.use_ssl)
            .field("auth_mechanism", &self.auth_mechanism)
            .field("kwargs", &self.kwargs)
            .finish()
    }
}

/// Parse a boolean flag given either as a JSON boolean or as text.
pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Column descriptor as reported by a cursor after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    /// Column name
    pub name: String,
    /// Engine type name, if the client reports one
    pub type_code: Option<String>,
}

impl ColumnDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_code: None,
        }
    }

    pub fn with_type_code(mut self, type_code: &str) -> Self {
        self.type_code = Some(type_code.to_string());
        self
    }
}

/// Client constructor.
#[async_trait]
pub trait ImpalaClient: Send + Sync {
    /// Open a connection.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the connection cannot be established.
    async fn connect(&self, args: ConnectArgs) -> Result<Box<dyn DbConnection>, ClientError>;
}

/// An open connection handle.
#[async_trait]
pub trait DbConnection: Send {
    /// Create a new cursor on this connection.
    async fn cursor(&mut self) -> Result<Box<dyn Cursor>, ClientError>;

    /// Commit the current transaction.
    async fn commit(&mut self) -> Result<(), ClientError>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), ClientError>;
}

/// Statement execution and row fetching.
#[async_trait]
pub trait Cursor: Send {
    /// Execute a statement with positional parameters.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), ClientError>;

    /// Fetch the next row, if any.
    async fn fetchone(&mut self) -> Result<Option<Row>, ClientError>;

    /// Fetch all remaining rows.
    async fn fetchall(&mut self) -> Result<Vec<Row>, ClientError>;

    /// Column descriptors of the last result, `None` if it produced no rows.
    fn description(&self) -> Option<Vec<ColumnDescription>>;

    /// Rows affected by the last statement, `-1` when unknown.
    fn rowcount(&self) -> i64;
}
