//! Hooks: the adapter between a stored connection and a running client.
//!
//! - `dbapi` - generic query helpers any SQL hook inherits
//! - `impala` - the Impala hook, connection arguments and URL building

pub mod dbapi;
pub mod impala;

pub use dbapi::{generate_insert_sql, DbApiHook};
pub use impala::{build_url, connect_args, ImpalaHook};
