//! Process-wide `tracing` setup driven by [`LogConfig`].
//!
//! [`ImpalaHook`](crate::ImpalaHook) installs the subscriber the first time it
//! opens a connection, so only the first configuration seen in a process
//! applies. An explicit level wins over `RUST_LOG`; with neither, only
//! warnings from this crate are shown.

use std::fs::OpenOptions;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const TARGET: &str = "impala_hook";

static ACTIVE: OnceLock<LogConfig> = OnceLock::new();

/// Log settings carried by [`HookConfig`](crate::HookConfig).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`, case-insensitive.
    pub level: Option<String>,
    /// Append to this file instead of writing to stderr.
    pub file: Option<String>,
}

impl LogConfig {
    pub fn is_off(&self) -> bool {
        self.level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("off"))
    }
}

/// `EnvFilter` directive for `config`, or `None` when logging is off.
pub fn filter_directive(config: &LogConfig) -> Option<String> {
    if config.is_off() {
        return None;
    }

    Some(match &config.level {
        Some(level) => format!("{}={}", TARGET, level.to_lowercase()),
        None => std::env::var(EnvFilter::DEFAULT_ENV)
            .unwrap_or_else(|_| format!("{}=warn", TARGET)),
    })
}

/// Install the subscriber once and return the configuration that won.
pub fn init_logging(config: &LogConfig) -> &'static LogConfig {
    ACTIVE.get_or_init(|| {
        if let Some(directive) = filter_directive(config) {
            install(&directive, config.file.as_deref());
        }
        config.clone()
    })
}

/// Configuration installed by [`init_logging`], if it has run.
pub fn active_config() -> Option<&'static LogConfig> {
    ACTIVE.get()
}

fn install(directive: &str, file: Option<&str>) {
    let writer = match file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => BoxMakeWriter::new(Mutex::new(f)),
            Err(e) => {
                eprintln!("impala-hook: cannot open log file {}: {}", path, e);
                return;
            }
        },
        None => BoxMakeWriter::new(std::io::stderr),
    };

    // Another subscriber may already be the global default.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(fmt::layer().with_writer(writer).with_ansi(file.is_none()))
        .try_init();
}
