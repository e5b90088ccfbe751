use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::cli::Args;

const ENV_PREFIX: &str = "PROPERTY_PICKER_";

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the listings API, without a trailing `/api`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// File the tracing subscriber writes to
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Per-request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "https://propertify.onrender.com".to_string()
}

fn default_log_file() -> String {
    "property_picker.log".to_string()
}

impl Config {
    /// Load configuration from `PROPERTY_PICKER_*` environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize the prefixed environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;

        Ok(config)
    }

    /// Apply command line overrides on top of the environment
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(url) = &args.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(path) = &args.log_file {
            self.log_file = path.clone();
        }
        if let Some(secs) = args.timeout {
            self.request_timeout_secs = Some(secs);
        }
        self
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init(args: &Args) -> Result<Config> {
    let config = Config::load()?.with_args(args);

    Ok(config)
}
