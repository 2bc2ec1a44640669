/// Application configuration, loaded from a JSON file
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::filter::FilterSpec;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "TANREND_CONFIG";

/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "tanrend.json";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP API listens on
    pub bind_address: String,
    pub fetch: FetchConfig,
    /// Filter applied when a search request does not carry its own
    pub default_filter: FilterSpec,
}

/// Settings for talking to the timetable site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Timetable search endpoint
    pub base_url: String,
    /// Optional proxy prefix; the target URL is appended to it verbatim
    pub proxy_url: Option<String>,
    /// Semester, e.g. "2022-2023-2" (form field `felev`)
    pub semester: String,
    /// Max rows the site returns (form field `darab`)
    pub page_size: u32,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// How long identical searches are served from memory
    pub cache_ttl_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tanrend.elte.hu/oktatoitanrend.php".to_string(),
            proxy_url: None,
            semester: "2022-2023-2".to_string(),
            page_size: 100,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 30,
            cache_ttl_secs: 5 * 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            fetch: FetchConfig::default(),
            default_filter: FilterSpec::compact(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `path`.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Parsed config, or defaults if the file doesn't exist
    /// * `Err` - If the file exists but can't be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
