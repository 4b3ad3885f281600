//! Structured connection URLs.
//!
//! [`ImpalaUrl`] mirrors the URL object SQL toolkits use to describe a
//! connection target:
//! `drivername://[username[:password]@]host[:port][/database][?key=value&...]`.

use crate::connection::record::{parse_query_params, split_host_port};
use crate::error::ConnectionError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Driver name used in Impala URLs.
pub const DRIVERNAME: &str = "impala";

/// Default Impala HiveServer2 port.
pub const DEFAULT_PORT: u16 = 21050;

const MASKED_PASSWORD: &str = "***";

/// Structured connection URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpalaUrl {
    pub drivername: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    /// Query parameters; values keep their JSON type until rendered.
    pub query: BTreeMap<String, Value>,
}

impl ImpalaUrl {
    /// Create a URL with only the driver name set.
    pub fn new(drivername: &str) -> Self {
        Self {
            drivername: drivername.to_string(),
            username: None,
            password: None,
            host: None,
            port: None,
            database: None,
            query: BTreeMap::new(),
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }

    pub fn with_query(mut self, query: BTreeMap<String, Value>) -> Self {
        self.query = query;
        self
    }

    /// Render the URL as a string.
    ///
    /// With `hide_password` the password is replaced by `***`. A present but
    /// empty password still renders its `:` separator.
    pub fn render_as_string(&self, hide_password: bool) -> String {
        let mut s = format!("{}://", self.drivername);

        if let Some(username) = &self.username {
            s.push_str(&urlencoding::encode(username));
            if let Some(password) = &self.password {
                s.push(':');
                if hide_password {
                    s.push_str(MASKED_PASSWORD);
                } else {
                    s.push_str(&urlencoding::encode(password));
                }
            }
            s.push('@');
        }

        if let Some(host) = &self.host {
            if host.contains(':') {
                s.push('[');
                s.push_str(host);
                s.push(']');
            } else {
                s.push_str(host);
            }
        }

        if let Some(port) = self.port {
            s.push(':');
            s.push_str(&port.to_string());
        }

        if let Some(database) = &self.database {
            s.push('/');
            s.push_str(&urlencoding::encode(database));
        }

        let pairs: Vec<String> = self
            .query
            .iter()
            .flat_map(|(key, value)| render_query_pair(key, value))
            .collect();
        if !pairs.is_empty() {
            s.push('?');
            s.push_str(&pairs.join("&"));
        }

        s
    }
}

/// Masked rendering, safe for logs.
impl fmt::Display for ImpalaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_as_string(true))
    }
}

impl FromStr for ImpalaUrl {
    type Err = ConnectionError;

    /// Parse a rendered URL. Query values come back as strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (drivername, rest) = s
            .split_once("://")
            .ok_or_else(|| ConnectionError::ParseError(format!("Could not parse URL: {}", s)))?;
        if drivername.is_empty() {
            return Err(ConnectionError::ParseError(
                "URL drivername cannot be empty".to_string(),
            ));
        }

        let (main_part, query_string) = match rest.split_once('?') {
            Some((main, query)) => (main, Some(query)),
            None => (rest, None),
        };

        let mut url = ImpalaUrl::new(drivername);

        let host_part = match main_part.rfind('@') {
            Some(pos) => {
                let auth = &main_part[..pos];
                match auth.split_once(':') {
                    Some((user, pass)) => {
                        url.username = Some(decode(user)?);
                        url.password = Some(decode(pass)?);
                    }
                    None => url.username = Some(decode(auth)?),
                }
                &main_part[pos + 1..]
            }
            None => main_part,
        };

        let (host_port, database) = match host_part.split_once('/') {
            Some((host_port, database)) => (host_port, Some(decode(database)?)),
            None => (host_part, None),
        };

        let (host, port) = split_host_port(host_port)?;
        if !host.is_empty() {
            url.host = Some(host);
        }
        url.port = port;
        // A trailing '/' is an empty database, not an absent one.
        url.database = database;
        url.query = parse_query_params(query_string)?
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        Ok(url)
    }
}

fn decode(s: &str) -> Result<String, ConnectionError> {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .map_err(|e| ConnectionError::ParseError(format!("Failed to decode '{}': {}", s, e)))
}

/// Render one query entry. Arrays repeat the key once per element.
fn render_query_pair(key: &str, value: &Value) -> Vec<String> {
    let key = urlencoding::encode(key);
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| format!("{}={}", key, urlencoding::encode(&render_query_value(item))))
            .collect(),
        other => vec![format!(
            "{}={}",
            key,
            urlencoding::encode(&render_query_value(other))
        )],
    }
}

fn render_query_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
