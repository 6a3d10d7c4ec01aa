//! # Config Module
//!
//! Loads the YAML file describing the service, the database and the tables
//! to expose.
//!
//! ## Format
//!
//! ```yaml
//! db:
//!   dsn: "reader:secret@tcp(localhost:3306)/shop"
//! service:
//!   name: Catalog
//!   host: api.example.com
//! introspect:
//!   timeout_secs: 30
//!   max_concurrency: 4
//! resources:
//!   products:
//!     title: Product
//!   order_items:
//!     title: Order Item
//!     definition:
//!       name: OrderItem
//! ```
//!
//! `resources` keeps declaration order; that order is the order of paths and
//! definitions in the generated document.
//!
//! `db.dsn` is either a `mysql://` URL or a `user:pass@tcp(host:port)/db`
//! connection string, which is converted to a URL.
//!
//! ## Environment Variables
//!
//! - `SWAGEN_DATABASE_URL` - overrides `db.dsn`
//! - `SWAGEN_INTROSPECT_TIMEOUT_SECS` - overrides `introspect.timeout_secs`
//! - `SWAGEN_MAX_CONCURRENCY` - overrides `introspect.max_concurrency`

use crate::assembler::{is_valid_definition_name, ResourceConfig};
use crate::model::ServiceInfo;
use anyhow::{bail, Context};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Root of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub db: DatabaseConfig,
    pub service: ServiceInfo,
    #[serde(default)]
    pub introspect: IntrospectSettings,
    /// Tables to expose, in declaration order
    #[serde(deserialize_with = "deserialize_resources")]
    pub resources: Vec<ResourceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, URL or `user:pass@tcp(host:port)/db` form
    #[serde(default)]
    pub dsn: Option<String>,
}

/// Limits applied while listing table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntrospectSettings {
    /// Deadline per table, in seconds; `0` disables it
    pub timeout_secs: u64,
    /// Tables introspected at once, also the connection pool size
    pub max_concurrency: usize,
}

impl Default for IntrospectSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_concurrency: 4,
        }
    }
}

impl IntrospectSettings {
    /// Apply `SWAGEN_INTROSPECT_TIMEOUT_SECS` and `SWAGEN_MAX_CONCURRENCY`.
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = env::var("SWAGEN_INTROSPECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.timeout_secs = secs;
        }
        if let Some(n) = env::var("SWAGEN_MAX_CONCURRENCY")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.max_concurrency = n;
        }
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Deserialize)]
struct ResourceEntry {
    title: String,
    #[serde(default)]
    definition: Option<DefinitionEntry>,
}

#[derive(Deserialize)]
struct DefinitionEntry {
    #[serde(default)]
    name: Option<String>,
}

fn deserialize_resources<'de, D>(deserializer: D) -> Result<Vec<ResourceConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ResourcesVisitor;

    impl<'de> Visitor<'de> for ResourcesVisitor {
        type Value = Vec<ResourceConfig>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of table name to resource")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut resources: Vec<ResourceConfig> = Vec::new();
            while let Some((table, entry)) = map.next_entry::<String, ResourceEntry>()? {
                if resources.iter().any(|r| r.table == table) {
                    return Err(de::Error::custom(format!(
                        "duplicate resource for table '{table}'"
                    )));
                }
                resources.push(ResourceConfig {
                    table,
                    title: entry.title,
                    definition_name: entry.definition.and_then(|d| d.name),
                });
            }
            Ok(resources)
        }
    }

    deserializer.deserialize_map(ResourcesVisitor)
}

impl Config {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for resource in &self.resources {
            if resource.table.trim().is_empty() {
                bail!("resource table name must not be empty");
            }
            if resource.title.trim().is_empty() {
                bail!("resource '{}' has an empty title", resource.table);
            }
            let name = resource.definition_name();
            if !is_valid_definition_name(&name) {
                bail!(
                    "resource '{}' has an invalid definition name '{name}' (letters, digits and '_' only)",
                    resource.table
                );
            }
        }
        Ok(())
    }

    /// Connection URL: `SWAGEN_DATABASE_URL` if set, else `db.dsn`.
    pub fn database_url(&self) -> anyhow::Result<String> {
        let dsn = match env::var("SWAGEN_DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.db.dsn.clone().context(
                "No database connection configured. Set db.dsn or SWAGEN_DATABASE_URL.",
            )?,
        };
        normalize_dsn(&dsn)
    }
}

/// Convert a connection string to a `mysql://` URL.
///
/// URLs are validated and returned unchanged. Strings in the
/// `user:pass@tcp(host:port)/db?params` form are rewritten; of the
/// parameters only `charset` and `collation` are kept.
pub fn normalize_dsn(dsn: &str) -> anyhow::Result<String> {
    let dsn = dsn.trim();
    if dsn.starts_with("mysql://") || dsn.starts_with("mariadb://") {
        let url = Url::parse(dsn).context("Invalid database URL")?;
        return Ok(url.to_string());
    }

    let Some((prefix, rest)) = dsn.rsplit_once('/') else {
        bail!("Invalid DSN: missing '/dbname'");
    };
    let (database, params) = rest.split_once('?').unwrap_or((rest, ""));

    let (user_info, address) = match prefix.rsplit_once('@') {
        Some((user_info, address)) => (Some(user_info), address),
        None => (None, prefix),
    };

    let mut socket = None;
    let host = if address.is_empty() {
        "localhost".to_string()
    } else if let Some(inner) = address.strip_prefix("tcp(").and_then(|a| a.strip_suffix(')')) {
        inner.to_string()
    } else if let Some(inner) = address.strip_prefix("unix(").and_then(|a| a.strip_suffix(')')) {
        socket = Some(inner.to_string());
        "localhost".to_string()
    } else {
        bail!("Invalid DSN: unsupported address '{address}'");
    };

    let mut url = String::from("mysql://");
    if let Some(user_info) = user_info {
        let (user, password) = match user_info.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (user_info, None),
        };
        url.push_str(&urlencoding::encode(user));
        if let Some(password) = password {
            url.push(':');
            url.push_str(&urlencoding::encode(password));
        }
        url.push('@');
    }
    url.push_str(&host);
    url.push('/');
    url.push_str(database);

    let mut query: Vec<String> = params
        .split('&')
        .filter(|p| p.starts_with("charset=") || p.starts_with("collation="))
        .map(str::to_string)
        .collect();
    if let Some(socket) = socket {
        query.push(format!("socket={}", urlencoding::encode(&socket)));
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }

    Url::parse(&url).context("Invalid DSN")?;
    Ok(url)
}

/// The URL with its password masked, for log output.
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            // Only fails for URLs that cannot carry credentials.
            if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
                return "<redacted>".to_string();
            }
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}
