//! Hook for Apache Impala.
//!
//! [`ImpalaHook`] turns the stored connection record into client arguments
//! or a connection URL, and gets the query helpers from [`DbApiHook`].

use super::dbapi::DbApiHook;
use crate::client::{ConnectArgs, DbConnection, ImpalaClient};
use crate::config::HookConfig;
use crate::connection::{Connection, ConnectionSource, EXTRA_KEY};
use crate::dataframe::DataFrameKind;
use crate::error::{ConnectionError, ImpalaError};
use crate::logging::init_logging;
use crate::url::{ImpalaUrl, DEFAULT_PORT, DRIVERNAME};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Interact with Apache Impala through an [`ImpalaClient`].
///
/// # Example
///
/// ```no_run
/// use impala_hook::{DbApiHook, ImpalaHook};
/// use impala_hook::client::ImpalaClient;
/// use impala_hook::connection::EnvConnectionSource;
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<dyn ImpalaClient>) -> Result<(), Box<dyn std::error::Error>> {
/// let hook = ImpalaHook::new(client, Arc::new(EnvConnectionSource::new()));
///
/// println!("{}", hook.sqlalchemy_url()?);
/// let first = hook.get_first("SELECT 1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ImpalaHook {
    client: Arc<dyn ImpalaClient>,
    source: Arc<dyn ConnectionSource>,
    config: HookConfig,
}

impl ImpalaHook {
    /// Create a hook for the default connection id.
    pub fn new(client: Arc<dyn ImpalaClient>, source: Arc<dyn ConnectionSource>) -> Self {
        Self {
            client,
            source,
            config: HookConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HookConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_conn_id(mut self, conn_id: &str) -> Self {
        self.config.conn_id = conn_id.to_string();
        self
    }

    pub fn conn_id(&self) -> &str {
        &self.config.conn_id
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Fetch this hook's connection record from the registry.
    pub fn connection(&self) -> Result<Connection, ConnectionError> {
        self.source.get_connection(&self.config.conn_id)
    }

    /// Structured URL for this hook's connection.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::MissingField` if the record has no host or
    /// no login.
    pub fn sqlalchemy_url(&self) -> Result<ImpalaUrl, ConnectionError> {
        build_url(&self.connection()?)
    }

    /// Connection URI with the password in clear text.
    pub fn get_uri(&self) -> Result<String, ConnectionError> {
        Ok(self.sqlalchemy_url()?.render_as_string(false))
    }
}

impl fmt::Debug for ImpalaHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpalaHook")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl DbApiHook for ImpalaHook {
    async fn get_conn(&self) -> Result<Box<dyn DbConnection>, ImpalaError> {
        init_logging(&self.config.log);

        let conn = self.connection()?;
        let args = connect_args(&conn);
        debug!(conn_id = %conn.conn_id, ?args, "Connecting to Impala");

        Ok(self.client.connect(args).await?)
    }

    fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    fn default_dataframe_kind(&self) -> DataFrameKind {
        self.config.dataframe_kind
    }
}

/// Client arguments for a connection record.
pub fn connect_args(conn: &Connection) -> ConnectArgs {
    ConnectArgs {
        host: conn.host.clone(),
        port: conn.port,
        user: conn.login.clone(),
        password: conn.password.clone(),
        database: conn.schema.clone(),
        ..Default::default()
    }
    .with_extras(conn.extra_dejson())
}

/// Build the structured URL for a connection record.
///
/// Host and login are required; `null` extras and the reserved `__extra__`
/// key never reach the query.
pub fn build_url(conn: &Connection) -> Result<ImpalaUrl, ConnectionError> {
    let host = required(&conn.host, "host")?;
    let login = required(&conn.login, "login")?;

    let query: BTreeMap<String, Value> = conn
        .extra_dejson()
        .into_iter()
        .filter(|(key, value)| !value.is_null() && key != EXTRA_KEY)
        .collect();

    Ok(ImpalaUrl::new(DRIVERNAME)
        .with_username(login)
        .with_password(conn.password.as_deref().unwrap_or_default())
        .with_host(host)
        .with_port(Some(conn.port.unwrap_or(DEFAULT_PORT)))
        .with_database(conn.schema.clone())
        .with_query(query))
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ConnectionError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConnectionError::missing(field)),
    }
}
