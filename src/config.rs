use crate::error::{Error, Result};
use crate::industry::NameSlotMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::sync::OnceLock;
use std::time::Duration;

pub const INDUSTRY_CLASSIFICATION_URL: &str = "https://finfo-api.vndirect.com.vn/v4/industry_classification";
pub const MAX_QUERY_SIZE: u32 = 9999;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

// YAML-serializable configuration structure; every field is optional
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ConfigYaml {
    pub industry_url: Option<String>,
    pub max_query_size: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub random_agent: Option<bool>,
    pub user_agents: Option<Vec<String>>,
    pub name_slot_mode: Option<NameSlotMode>,
}

// Holds library-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub industry_url: String,
    pub max_query_size: u32,
    pub request_timeout: Duration,
    pub random_agent: bool,
    pub user_agents: Vec<String>,
    pub name_slot_mode: NameSlotMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            industry_url: INDUSTRY_CLASSIFICATION_URL.to_string(),
            max_query_size: MAX_QUERY_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            random_agent: true,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            name_slot_mode: NameSlotMode::default(),
        }
    }
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> Result<Self> {
        // Check for CONFIG_FILE environment variable first
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    // Load configuration from YAML file
    pub fn from_yaml(file_path: &str) -> Result<Self> {
        let yaml_content = fs::read_to_string(file_path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", file_path, e)))?;

        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        let yaml_config: ConfigYaml = serde_yaml::from_str(yaml_content)?;
        let defaults = Self::default();

        let config = Self {
            industry_url: yaml_config.industry_url.unwrap_or(defaults.industry_url),
            max_query_size: yaml_config.max_query_size.unwrap_or(defaults.max_query_size),
            request_timeout: yaml_config
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            random_agent: yaml_config.random_agent.unwrap_or(defaults.random_agent),
            user_agents: yaml_config.user_agents.unwrap_or(defaults.user_agents),
            name_slot_mode: yaml_config.name_slot_mode.unwrap_or(defaults.name_slot_mode),
        };
        config.validate()
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so callers and tests
    /// can supply variables without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let industry_url = lookup("VNQUANT_INDUSTRY_URL").unwrap_or(defaults.industry_url);

        let max_query_size = match lookup("VNQUANT_MAX_QUERY_SIZE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("VNQUANT_MAX_QUERY_SIZE is not an integer: {}", raw)))?,
            None => defaults.max_query_size,
        };

        let request_timeout = match lookup("VNQUANT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                Error::Config(format!("VNQUANT_REQUEST_TIMEOUT_SECS is not an integer: {}", raw))
            })?),
            None => defaults.request_timeout,
        };

        let random_agent = lookup("VNQUANT_RANDOM_AGENT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.random_agent);

        let name_slot_mode = match lookup("VNQUANT_LEGACY_NAME_SLOT").and_then(|s| s.parse::<bool>().ok()) {
            Some(true) => NameSlotMode::Legacy,
            _ => defaults.name_slot_mode,
        };

        Self {
            industry_url,
            max_query_size,
            request_timeout,
            random_agent,
            user_agents: defaults.user_agents,
            name_slot_mode,
        }
        .validate()
    }

    fn validate(self) -> Result<Self> {
        if self.user_agents.is_empty() {
            return Err(Error::Config("user_agents must not be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request timeout must be greater than zero".to_string()));
        }
        url::Url::parse(&self.industry_url)
            .map_err(|e| Error::Config(format!("Invalid industry_url {}: {}", self.industry_url, e)))?;
        Ok(self)
    }
}

static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Process-wide configuration, loaded on first access and immutable afterwards.
pub fn global() -> &'static AppConfig {
    GLOBAL_CONFIG.get_or_init(|| match AppConfig::load() {
        Ok(config) => {
            tracing::debug!(industry_url = %config.industry_url, "Loaded configuration");
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load configuration, using defaults");
            AppConfig::default()
        }
    })
}

/// Installs `config` as the process-wide configuration. Fails if it was already loaded.
pub fn init(config: AppConfig) -> Result<()> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| Error::Config("configuration already initialized".to_string()))
}
