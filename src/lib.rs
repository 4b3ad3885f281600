//! # impala-hook
//!
//! Connection hook for Apache Impala.
//!
//! This library maps a stored connection record onto the arguments of an
//! Impala client, builds connection URLs from stored credentials, and runs
//! statements through a DB-API style client, collecting results into rows or
//! Apache Arrow record batches.
//!
//! ## Example
//!
//! ```no_run
//! # use impala_hook::*;
//! # use impala_hook::client::ImpalaClient;
//! # use std::sync::Arc;
//! # async fn example(client: Arc<dyn ImpalaClient>) -> Result<(), Box<dyn std::error::Error>> {
//! // Connections are looked up in AIRFLOW_CONN_<ID> variables
//! let hook = ImpalaHook::new(client, Arc::new(EnvConnectionSource::new()));
//!
//! // Connection URI, password in clear text
//! let uri = hook.get_uri()?;
//!
//! // Run a query into an Arrow RecordBatch
//! let df = hook.get_df("SELECT * FROM my_table", Some(DataFrameKind::Arrow)).await?;
//! println!("Rows: {}", df.num_rows());
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod connection;
pub mod dataframe;
pub mod error;
pub mod hook;
pub mod logging;
pub mod url;

// Re-export public API
pub use client::{ConnectArgs, Cursor, DbConnection, ImpalaClient, Row};
pub use config::HookConfig;
pub use connection::{Connection, ConnectionSource, EnvConnectionSource, StaticConnectionSource};
pub use dataframe::{DataFrame, DataFrameKind, RowFrame};
pub use error::{ClientError, ConnectionError, ConversionError, ImpalaError};
pub use hook::{DbApiHook, ImpalaHook};
pub use url::ImpalaUrl;
