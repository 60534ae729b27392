use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (comma separated, "*" for any)
    pub cors_origins: Option<String>,

    /// Database URL
    pub db_url: Option<String>,

    /// Base URL of the code execution runner service
    pub runner_url: Option<String>,

    /// Interval between server-side WebSocket pings, in seconds
    #[serde(default = "default_ws_heartbeat_secs")]
    pub ws_heartbeat_secs: u64,

    /// Request timeout for the runner service, in seconds
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,

    /// Maximum captured execution output, in bytes
    #[serde(default = "default_max_output_length")]
    pub max_output_length: usize,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        // Load from environment variables using envy
        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: None,
            db_url: None,
            runner_url: None,
            ws_heartbeat_secs: default_ws_heartbeat_secs(),
            execution_timeout_secs: default_execution_timeout_secs(),
            max_output_length: default_max_output_length(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_ws_heartbeat_secs() -> u64 {
    30
}

fn default_execution_timeout_secs() -> u64 {
    5
}

fn default_max_output_length() -> usize {
    10_000
}
