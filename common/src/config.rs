use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5328/api/benefits_and_cost_sharing";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {source}")]
    ParseError { source: serde_json::Error },
    #[error("Failed to parse TOML config: {source}")]
    TomlParseError { source: toml::de::Error },
}

/// Settings for talking to the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plans4YouConfig {
    /// Endpoint the form values are posted to
    pub endpoint: String,
    /// Artificial delay before the request is sent, in milliseconds
    pub response_delay_ms: u64,
    /// Whole-request timeout, in seconds
    pub request_timeout_secs: u64,
    /// Log file used by the interactive front end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl Default for Plans4YouConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            response_delay_ms: 3000,
            request_timeout_secs: 30,
            log_path: None,
        }
    }
}

impl Plans4YouConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|source| ConfigError::TomlParseError { source })
        } else {
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError { source })
        }
    }

    /// Candidate config files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".plans4you/config.toml"),
            PathBuf::from(".plans4you/config.json"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("plans4you").join("config.toml"));
        }
        paths
    }

    /// Load from the first existing candidate, falling back to defaults.
    /// Problems are appended to `warnings` instead of being logged, so the
    /// caller can report them once its subscriber is installed.
    pub fn load_with_fallback(warnings: &mut Vec<String>) -> Self {
        Self::load_first_of(&Self::search_paths(), warnings)
    }

    pub fn load_first_of(paths: &[PathBuf], warnings: &mut Vec<String>) -> Self {
        for path in paths {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        let message = format!("Failed to load config from {}: {e}", path.display());
                        warnings.push(message);
                    }
                }
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Load with fallback, then apply `PLANS4YOU_*` environment overrides.
    /// Returns the config together with the warnings raised on the way.
    pub fn from_env() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut config = Self::load_with_fallback(&mut warnings);
        config.apply_overrides(|key| std::env::var(key).ok(), &mut warnings);
        (config, warnings)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F, warnings: &mut Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("PLANS4YOU_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(ms) = parse_override(&lookup, "PLANS4YOU_DELAY_MS", warnings) {
            self.response_delay_ms = ms;
        }
        if let Some(secs) = parse_override(&lookup, "PLANS4YOU_TIMEOUT_SECS", warnings) {
            self.request_timeout_secs = secs;
        }
        if let Some(path) = lookup("PLANS4YOU_LOG_PATH").filter(|v| !v.is_empty()) {
            self.log_path = Some(PathBuf::from(path));
        }
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Log file for the interactive UI; the temp dir when unset.
    pub fn log_file(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("plans4you.log"))
    }
}

fn parse_override<F>(lookup: &F, key: &str, warnings: &mut Vec<String>) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(format!("Ignoring {key}={raw}: {e}"));
            None
        }
    }
}
