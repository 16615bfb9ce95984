//! Debug module configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::context::START_TIME_HEADER;
use crate::error::DebugError;

/// Configuration for the worker debug module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Unique id of the module, used as the first segment of debug routes.
    #[serde(default = "default_module_id")]
    pub module_id: String,

    /// Request header carrying the start-time marker.
    #[serde(default = "default_start_time_header")]
    pub start_time_header: String,

    /// Client addresses allowed to receive debug headers.
    ///
    /// A trailing `*` matches any address with the preceding prefix.
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,

    /// How links to the debug view are rendered.
    #[serde(default)]
    pub url_format: UrlFormat,
}

/// Link rendering style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum UrlFormat {
    /// Route passed as the `r` query parameter of an entry script.
    Query {
        /// Entry script URL (e.g. "/index.php").
        #[serde(default = "default_script_url")]
        script_url: String,
    },
    /// Route rendered as the URL path.
    Path,
}

impl Default for UrlFormat {
    fn default() -> Self {
        Self::Query {
            script_url: default_script_url(),
        }
    }
}

fn default_module_id() -> String {
    "debug".to_string()
}

fn default_start_time_header() -> String {
    START_TIME_HEADER.to_string()
}

fn default_allowed_ips() -> Vec<String> {
    vec!["127.0.0.1".to_string(), "::1".to_string()]
}

fn default_script_url() -> String {
    "/index.php".to_string()
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            module_id: default_module_id(),
            start_time_header: default_start_time_header(),
            allowed_ips: default_allowed_ips(),
            url_format: UrlFormat::default(),
        }
    }
}

impl DebugConfig {
    /// Create a configuration for a module with the given id.
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            ..Default::default()
        }
    }

    /// Set the start-time header name.
    pub fn with_start_time_header(mut self, header: impl Into<String>) -> Self {
        self.start_time_header = header.into();
        self
    }

    /// Set the allowed client addresses.
    pub fn with_allowed_ips(mut self, ips: Vec<&str>) -> Self {
        self.allowed_ips = ips.into_iter().map(String::from).collect();
        self
    }

    /// Set the link rendering style.
    pub fn with_url_format(mut self, format: UrlFormat) -> Self {
        self.url_format = format;
        self
    }

    /// Check the configuration for values the module cannot work with.
    pub fn validate(&self) -> Result<(), DebugError> {
        if self.module_id.trim().is_empty() {
            return Err(DebugError::Config("module_id must not be empty".to_string()));
        }
        if self.start_time_header.trim().is_empty() {
            return Err(DebugError::Config(
                "start_time_header must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse JSON config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a `.toml` or `.json` file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            Self::from_json(&content).with_context(|| format!("Invalid config: {}", path))
        } else {
            Self::from_toml(&content).with_context(|| format!("Invalid config: {}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_config_default() {
        let config = DebugConfig::default();

        assert_eq!(config.module_id, "debug");
        assert_eq!(config.start_time_header, "statelessAppStartTime");
        assert_eq!(config.allowed_ips, vec!["127.0.0.1", "::1"]);
        assert_eq!(
            config.url_format,
            UrlFormat::Query {
                script_url: "/index.php".to_string()
            }
        );
    }

    #[test]
    fn test_debug_config_builder_chain() {
        let config = DebugConfig::new("profiler")
            .with_start_time_header("X-Job-Start")
            .with_allowed_ips(vec!["10.0.*"])
            .with_url_format(UrlFormat::Path);

        assert_eq!(config.module_id, "profiler");
        assert_eq!(config.start_time_header, "X-Job-Start");
        assert_eq!(config.allowed_ips, vec!["10.0.*"]);
        assert_eq!(config.url_format, UrlFormat::Path);
    }

    #[test]
    fn test_debug_config_from_toml_fills_defaults() {
        let config = DebugConfig::from_toml(
            r#"
            module_id = "dbg"

            [url_format]
            style = "path"
            "#,
        )
        .unwrap();

        assert_eq!(config.module_id, "dbg");
        assert_eq!(config.start_time_header, "statelessAppStartTime");
        assert_eq!(config.url_format, UrlFormat::Path);
    }

    #[test]
    fn test_debug_config_from_json() {
        let config = DebugConfig::from_json(
            r#"{"allowed_ips": ["*"], "url_format": {"style": "query", "script_url": "/app.php"}}"#,
        )
        .unwrap();

        assert_eq!(config.module_id, "debug");
        assert_eq!(config.allowed_ips, vec!["*"]);
        assert_eq!(
            config.url_format,
            UrlFormat::Query {
                script_url: "/app.php".to_string()
            }
        );
    }

    #[test]
    fn test_debug_config_rejects_empty_module_id() {
        assert!(DebugConfig::from_toml(r#"module_id = "  ""#).is_err());
        assert!(DebugConfig::new("").validate().is_err());
    }

    #[test]
    fn test_debug_config_load_missing_file() {
        let err = DebugConfig::load("/nonexistent/worker-debug.toml").unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_debug_config_load_from_disk() {
        let path = std::env::temp_dir().join(format!("worker-debug-{}.toml", std::process::id()));
        std::fs::write(&path, "module_id = \"ops-debug\"\n").unwrap();

        let config = DebugConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.module_id, "ops-debug");
    }
}
