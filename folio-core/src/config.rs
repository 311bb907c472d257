//! Configuration for folio

use crate::FolioError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[content]
# Base origin of the content store serving index.json and *.md bodies
base_url = "http://127.0.0.1:8080"

[client]
# How a slug falls back to its folder index: "sequential" tries <slug>.md
# first and <slug>/index.md only if that is missing; "parallel" probes both
probe = "sequential"

[cache]
# How long folio-service keeps a fetched index before refetching it
# (e.g., "30s", "5m", "1h")
ttl = "5m"

[service]
bind = "127.0.0.1"
port = 3000
"#;

/// Folio configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl ContentConfig {
    /// Serialized index tree, relative to the base URL
    pub const INDEX_FILE: &'static str = "index.json";
    /// Extension of document bodies
    pub const EXTENSION: &'static str = "md";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStrategy {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub probe: ProbeStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_ttl() -> String {
    "5m".to_string()
}
fn default_bind() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: default_ttl() }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FolioError::ConfigParse(e.to_string()))?;
        config.ttl_duration()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Get cache TTL as Duration
    pub fn ttl_duration(&self) -> crate::Result<Duration> {
        parse_duration(&self.cache.ttl).ok_or_else(|| {
            FolioError::ConfigParse(format!(
                "invalid cache.ttl {:?}, expected e.g. \"30s\", \"5m\", \"1h\" or \"1d\"",
                self.cache.ttl
            ))
        })
    }
}

/// Parse duration string (e.g., "30s", "5m", "1h", "1d")
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (split, unit) = s.char_indices().last()?;
    let num: u64 = s[..split].parse().ok()?;

    let scale = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return None,
    };
    num.checked_mul(scale).map(Duration::from_secs)
}
