//! Connections, dialects and catalog expressions (`queries.json`).

use quarry_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};

/// How a dialect expresses a row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LimitStyle {
    /// Prefix after `SELECT` (`TOP {n}`)
    Top,
    /// Trailing clause with a row count (`FETCH FIRST {n} ROWS ONLY`)
    FetchFirst,
    /// Trailing clause with row count and offset (`LIMIT {n} OFFSET {o}`)
    Limit,
    /// Anything else; renders no limit
    #[serde(other)]
    Unknown,
}

/// Limit syntax of a dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct LimitConfig {
    /// Where the clause goes
    style: LimitStyle,
    /// Clause template with `{n}` (rows) and `{o}` (offset) placeholders
    template: String,
}

impl LimitConfig {
    /// Create a limit configuration.
    pub fn new(style: LimitStyle, template: impl Into<String>) -> Self {
        Self {
            style,
            template: template.into(),
        }
    }

    /// Fill the template with a row count and offset.
    pub fn render(&self, rows: u64, offset: u64) -> String {
        self.template
            .replace("{n}", &rows.to_string())
            .replace("{o}", &offset.to_string())
    }
}

/// Per-dialect rendering rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DialectConfig {
    /// Limit syntax; dialects without one render no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<LimitConfig>,
}

impl DialectConfig {
    /// Create a dialect configuration.
    pub fn new(limit: Option<LimitConfig>) -> Self {
        Self { limit }
    }
}

/// Extra connection options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ConnectionOptions {
    /// Client character set, e.g. `UTF-8`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding: Option<String>,
}

/// A named database connection.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct ConnectionConfig {
    /// Connection name referenced by views
    name: String,
    /// Dialect used to render SQL for this connection
    dialect: String,
    /// Data source name; takes precedence over driver settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dsn: Option<String>,
    /// Driver name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    driver: Option<String>,
    /// Server host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server: Option<String>,
    /// Server port, as number or text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<serde_json::Value>,
    /// Database name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    /// Environment variable holding the user name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_env: Option<String>,
    /// Environment variable holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_env: Option<String>,
    /// Extra options
    #[serde(default)]
    options: ConnectionOptions,
}

impl ConnectionConfig {
    /// Create a connection with just a name and a dialect.
    pub fn new(name: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialect: dialect.into(),
            ..Self::default()
        }
    }

    /// Assemble the `KEY=value;...` connection string.
    ///
    /// Credentials are read from the environment variables named by
    /// `user_env` and `password_env`; unset or empty variables are skipped.
    pub fn connection_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(dsn) = self.dsn.as_deref().filter(|d| !d.is_empty()) {
            parts.push(format!("DSN={}", dsn));
        } else {
            parts.push(format!("DRIVER={}", self.driver.as_deref().unwrap_or_default()));
            if let Some(server) = self.server.as_deref().filter(|s| !s.is_empty()) {
                parts.push(format!("SERVER={}", server));
            }
            if let Some(port) = self.port.as_ref().and_then(port_text) {
                parts.push(format!("PORT={}", port));
            }
            if let Some(database) = self.database.as_deref().filter(|d| !d.is_empty()) {
                parts.push(format!("DATABASE={}", database));
            }
        }
        if let Some(uid) = env_value(self.user_env.as_deref()) {
            parts.push(format!("UID={}", uid));
        }
        if let Some(pwd) = env_value(self.password_env.as_deref()) {
            parts.push(format!("PWD={}", pwd));
        }
        if self.options.encoding.as_deref() == Some("UTF-8") {
            parts.push("CHARSET=UTF8".to_string());
        }
        parts.join(";")
    }
}

fn port_text(port: &serde_json::Value) -> Option<String> {
    match port {
        serde_json::Value::Number(n) if n.as_u64() != Some(0) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn env_value(name: Option<&str>) -> Option<String> {
    let name = name.filter(|n| !n.is_empty())?;
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Named SQL expression with per-dialect templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct CatalogExpression {
    /// Template per dialect, with `{}` / `{0}` positional placeholders
    by_dialect: BTreeMap<String, String>,
    /// Static arguments substituted into the template
    #[serde(default)]
    args: Vec<String>,
}

impl CatalogExpression {
    /// Create a catalog expression.
    pub fn new(by_dialect: BTreeMap<String, String>, args: Vec<String>) -> Self {
        Self { by_dialect, args }
    }

    /// Template for a dialect.
    pub fn template_for(&self, dialect: &str) -> Option<&str> {
        self.by_dialect.get(dialect).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct CatalogSection {
    #[serde(default)]
    expressions: BTreeMap<String, CatalogExpression>,
}

/// Governing configuration: connections, dialects and catalog expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    connections: Vec<ConnectionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_connection: Option<String>,
    dialects: BTreeMap<String, DialectConfig>,
    #[serde(default)]
    catalog: CatalogSection,
}

impl Catalog {
    /// Build and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is defined.
    pub fn new(
        connections: Vec<ConnectionConfig>,
        default_connection: Option<String>,
        dialects: BTreeMap<String, DialectConfig>,
        expressions: BTreeMap<String, CatalogExpression>,
    ) -> Result<Self, ConfigError> {
        let catalog = Self {
            connections,
            default_connection,
            dialects,
            catalog: CatalogSection { expressions },
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse `queries.json` text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, `dialects` is missing, or no
    /// connection is defined.
    #[instrument(skip(json), fields(json_len = json.len()))]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        if raw.get("dialects").is_none() {
            return Err(ConfigError::new("queries.json must define dialects"));
        }
        let catalog: Catalog = serde_json::from_value(raw)?;
        catalog.validate()?;
        debug!(
            connections = catalog.connections.len(),
            dialects = catalog.dialects.len(),
            expressions = catalog.catalog.expressions.len(),
            "Parsed catalog"
        );
        Ok(catalog)
    }

    /// Load `queries.json` from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read catalog file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.connections.is_empty() {
            return Err(ConfigError::new(
                "queries.json must define at least one connection",
            ));
        }
        Ok(())
    }

    /// Connection by name.
    pub fn connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.iter().find(|c| c.name == name)
    }

    /// All connections in declaration order.
    pub fn connections(&self) -> &[ConnectionConfig] {
        &self.connections
    }

    /// Name of the default connection: the declared default, else the first one.
    pub fn default_connection_name(&self) -> &str {
        self.default_connection
            .as_deref()
            .or_else(|| self.connections.first().map(|c| c.name.as_str()))
            .unwrap_or_default()
    }

    /// Rendering rules of a dialect.
    pub fn dialect(&self, name: &str) -> Option<&DialectConfig> {
        self.dialects.get(name)
    }

    /// Catalog expression by reference name.
    pub fn expression(&self, reference: &str) -> Option<&CatalogExpression> {
        self.catalog.expressions.get(reference)
    }
}
