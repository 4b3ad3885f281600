//! Hook configuration.
//!
//! # Example
//!
//! ```
//! # use impala_hook::config::HookConfig;
//! # use impala_hook::dataframe::DataFrameKind;
//! let config = HookConfig::builder()
//!     .conn_id("impala_prod")
//!     .dataframe_kind(DataFrameKind::Rows)
//!     .build();
//!
//! assert_eq!(config.conn_id, "impala_prod");
//! ```

use crate::dataframe::DataFrameKind;
use crate::error::ConnectionError;
use crate::logging::LogConfig;
use std::env;

/// Default registry id of the Impala connection.
pub const DEFAULT_CONN_ID: &str = "impala_default";

/// Placeholder used in generated INSERT statements.
pub const DEFAULT_PLACEHOLDER: &str = "%s";

pub const ENV_CONN_ID: &str = "IMPALA_CONN_ID";
pub const ENV_DF_TYPE: &str = "IMPALA_DF_TYPE";
pub const ENV_LOG_LEVEL: &str = "IMPALA_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "IMPALA_LOG_FILE";

/// Hook configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Registry id of the connection record
    pub conn_id: String,

    /// Container `get_df` builds when none is requested
    pub dataframe_kind: DataFrameKind,

    /// Parameter placeholder for generated statements
    pub placeholder: String,

    /// Logging setup
    pub log: LogConfig,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            conn_id: DEFAULT_CONN_ID.to_string(),
            dataframe_kind: DataFrameKind::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            log: LogConfig::default(),
        }
    }
}

impl HookConfig {
    pub fn builder() -> HookConfigBuilder {
        HookConfigBuilder::new()
    }

    /// Defaults overridden by `IMPALA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidParameter` if `IMPALA_DF_TYPE` names an
    /// unknown backend.
    pub fn from_env() -> Result<Self, ConnectionError> {
        let mut builder = HookConfigBuilder::new();

        if let Ok(conn_id) = env::var(ENV_CONN_ID) {
            builder = builder.conn_id(&conn_id);
        }
        if let Ok(kind) = env::var(ENV_DF_TYPE) {
            let kind = kind.parse::<DataFrameKind>().map_err(|e| {
                ConnectionError::InvalidParameter {
                    parameter: ENV_DF_TYPE.to_string(),
                    message: e.to_string(),
                }
            })?;
            builder = builder.dataframe_kind(kind);
        }
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            builder = builder.log_level(&level);
        }
        if let Ok(file) = env::var(ENV_LOG_FILE) {
            builder = builder.log_file(&file);
        }

        Ok(builder.build())
    }
}

/// Builder for [`HookConfig`].
#[derive(Debug, Clone, Default)]
pub struct HookConfigBuilder {
    conn_id: Option<String>,
    dataframe_kind: Option<DataFrameKind>,
    placeholder: Option<String>,
    log: LogConfig,
}

impl HookConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conn_id(mut self, conn_id: &str) -> Self {
        self.conn_id = Some(conn_id.to_string());
        self
    }

    pub fn dataframe_kind(mut self, kind: DataFrameKind) -> Self {
        self.dataframe_kind = Some(kind);
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.log.level = Some(level.to_string());
        self
    }

    pub fn log_file(mut self, file: &str) -> Self {
        self.log.file = Some(file.to_string());
        self
    }

    pub fn build(self) -> HookConfig {
        HookConfig {
            conn_id: self
                .conn_id
                .unwrap_or_else(|| DEFAULT_CONN_ID.to_string()),
            dataframe_kind: self.dataframe_kind.unwrap_or_default(),
            placeholder: self
                .placeholder
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
            log: self.log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HookConfig::default();
        assert_eq!(config.conn_id, "impala_default");
        assert_eq!(config.dataframe_kind, DataFrameKind::Arrow);
        assert_eq!(config.placeholder, "%s");
        assert_eq!(config, HookConfig::builder().build());
    }

    #[test]
    fn test_builder_full() {
        let config = HookConfig::builder()
            .conn_id("impala_prod")
            .dataframe_kind(DataFrameKind::Rows)
            .placeholder("?")
            .log_level("debug")
            .log_file("/tmp/impala.log")
            .build();

        assert_eq!(config.conn_id, "impala_prod");
        assert_eq!(config.dataframe_kind, DataFrameKind::Rows);
        assert_eq!(config.placeholder, "?");
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.log.file.as_deref(), Some("/tmp/impala.log"));
    }

    // Single test so the shared process environment is not raced.
    #[test]
    fn test_from_env() {
        env::set_var(ENV_CONN_ID, "impala_env");
        env::set_var(ENV_DF_TYPE, "polars");
        let config = HookConfig::from_env().unwrap();
        assert_eq!(config.conn_id, "impala_env");
        assert_eq!(config.dataframe_kind, DataFrameKind::Rows);

        env::set_var(ENV_DF_TYPE, "spreadsheet");
        assert!(matches!(
            HookConfig::from_env(),
            Err(ConnectionError::InvalidParameter { .. })
        ));

        env::remove_var(ENV_CONN_ID);
        env::remove_var(ENV_DF_TYPE);
    }
}
