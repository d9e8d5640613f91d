use crate::error::{ConfigError, Result as AppResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Fixed batch of ten questions; the count is not a setting.
pub const DEFAULT_PROVIDER_URL: &str = "https://opentdb.com/api.php?amount=10";
pub const DEFAULT_LOG_FILE: &str = "trivia.log";
pub const DEFAULT_LOG_FILTER: &str = "trivia=info";

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub url: String,
    /// No timeout unless configured; a hung request keeps the quiz loading.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub file: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

pub fn load_settings() -> AppResult<AppSettings> {
    let builder = Config::builder()
        .set_default("provider.url", DEFAULT_PROVIDER_URL)
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .set_default("logging.file", DEFAULT_LOG_FILE)
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .set_default("logging.filter", DEFAULT_LOG_FILTER)
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .separator("__")
                .try_parsing(true),
        );

    let settings = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: AppSettings = settings
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &AppSettings) -> Result<(), ConfigError> {
    let url = settings.provider.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(format!(
            "provider.url must be an http(s) URL, got '{}'",
            settings.provider.url
        )));
    }
    if settings.provider.timeout_seconds == Some(0) {
        return Err(ConfigError::InvalidValue(
            "provider.timeout_seconds must be greater than zero".to_string(),
        ));
    }
    if settings.logging.file.trim().is_empty() {
        return Err(ConfigError::InvalidValue(
            "logging.file must not be empty".to_string(),
        ));
    }
    Ok(())
}
