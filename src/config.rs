//! TOML configuration.
//!
//! Every field has a default, so the server runs against `https://molsen.ca`
//! with no file at all. A file only needs the keys it wants to override:
//!
//! ```toml
//! [source]
//! base_url = "https://molsen.ca"
//!
//! [cache]
//! ttl_secs = 300
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Location of the upstream JSON resources.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_essays_path")]
    pub essays_path: String,
    #[serde(default = "default_graph_path")]
    pub graph_path: String,
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            essays_path: default_essays_path(),
            graph_path: default_graph_path(),
            metadata_path: default_metadata_path(),
        }
    }
}

fn default_base_url() -> String {
    "https://molsen.ca".to_string()
}
fn default_essays_path() -> String {
    "/api/essays.json".to_string()
}
fn default_graph_path() -> String {
    "/js/knowledge-graph.json".to_string()
}
fn default_metadata_path() -> String {
    "/api/metadata.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn default_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request deadline. Unset leaves the transport's own behaviour in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("molsen-mcp/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        let base = self.source.base_url.trim();
        if base.is_empty() {
            anyhow::bail!("source.base_url must not be empty");
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            anyhow::bail!(
                "source.base_url must start with http:// or https:// (got '{}')",
                base
            );
        }

        for (key, path) in [
            ("source.essays_path", &self.source.essays_path),
            ("source.graph_path", &self.source.graph_path),
            ("source.metadata_path", &self.source.metadata_path),
        ] {
            if !path.starts_with('/') {
                anyhow::bail!("{} must start with '/' (got '{}')", key, path);
            }
        }

        if self.cache.ttl_secs == 0 {
            anyhow::bail!("cache.ttl_secs must be > 0");
        }
        if self.http.timeout_secs == Some(0) {
            anyhow::bail!("http.timeout_secs must be > 0");
        }
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
