//! Configuration for the viewer.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (HASHVIEW_ENDPOINT, HASHVIEW_TIMEOUT_SECONDS)
//! 2. Config file (.hashview/config.yaml, then ~/.config/hashview/config.yaml)
//! 3. Defaults (local indexing client at http://127.0.0.1:8964)
//!
//! Config file discovery:
//! - Searches current directory and parents for .hashview/config.yaml
//! - Falls back to the user config directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::http::DEFAULT_CONTENT_PATH;

/// Default endpoint (local indexing client)
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8964";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const ENV_ENDPOINT: &str = "HASHVIEW_ENDPOINT";
const ENV_TIMEOUT: &str = "HASHVIEW_TIMEOUT_SECONDS";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Extra extension to language mappings for code listings
    #[serde(default)]
    pub languages: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Endpoint origin
    pub endpoint: String,
    /// Content API path
    pub content_path: String,
    pub timeout_seconds: u64,
    /// Extension to language overrides
    pub languages: HashMap<String, String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            content_path: DEFAULT_CONTENT_PATH.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            languages: HashMap::new(),
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".hashview").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("hashview").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge file settings and environment over defaults
fn resolve<F>(file: Option<(PathBuf, ConfigFile)>, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ResolvedConfig::default();

    if let Some((config_path, file)) = file {
        if let Some(base_url) = file.endpoint.base_url {
            config.endpoint = base_url;
        }
        if let Some(content_path) = file.endpoint.path {
            config.content_path = content_path;
        }
        if let Some(timeout) = file.endpoint.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        config.languages = file.languages;
        config.config_file = Some(config_path);
    }

    if let Some(endpoint) = env(ENV_ENDPOINT).filter(|s| !s.trim().is_empty()) {
        config.endpoint = endpoint;
    }
    if let Some(timeout) = env(ENV_TIMEOUT) {
        config.timeout_seconds = timeout
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT, timeout))?;
    }

    if config.timeout_seconds == 0 {
        anyhow::bail!("Timeout must be at least 1 second");
    }

    Ok(config)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    resolve(file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, no_env).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:8964");
        assert_eq!(config.content_path, "/api/md5");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.languages.is_empty());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".hashview");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
endpoint:
  base_url: http://files.lan:9000
  timeout_seconds: 5
languages:
  proto: protobuf
  tf: hcl
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.endpoint.base_url.as_deref(), Some("http://files.lan:9000"));
        assert!(parsed.endpoint.path.is_none());

        let config = resolve(Some((config_path.clone(), parsed)), no_env).unwrap();
        assert_eq!(config.endpoint, "http://files.lan:9000");
        assert_eq!(config.content_path, "/api/md5");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.languages.get("proto"), Some(&"protobuf".to_string()));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            endpoint: EndpointConfig {
                base_url: Some("http://from-file".to_string()),
                path: Some("/content".to_string()),
                timeout_seconds: Some(5),
            },
            languages: HashMap::new(),
        };

        let env = |key: &str| match key {
            "HASHVIEW_ENDPOINT" => Some("http://from-env".to_string()),
            "HASHVIEW_TIMEOUT_SECONDS" => Some("12".to_string()),
            _ => None,
        };

        let config = resolve(Some((PathBuf::from("/tmp/config.yaml"), file)), env).unwrap();
        assert_eq!(config.endpoint, "http://from-env");
        assert_eq!(config.content_path, "/content");
        assert_eq!(config.timeout_seconds, 12);
    }

    #[test]
    fn test_invalid_timeouts_rejected() {
        let bad = |key: &str| (key == "HASHVIEW_TIMEOUT_SECONDS").then(|| "soon".to_string());
        assert!(resolve(None, bad).is_err());

        let zero = |key: &str| (key == "HASHVIEW_TIMEOUT_SECONDS").then(|| "0".to_string());
        assert!(resolve(None, zero).is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "endpoint: [not, a, mapping").unwrap();
        assert!(load_config_file(&path).is_err());
    }
}
