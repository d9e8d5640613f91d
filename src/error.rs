use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Load(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Everything that can go wrong while loading the question batch.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP fetch failed for {url}: {source}")]
    HttpFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Provider returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("Failed to parse provider payload: {0}")]
    Parse(String),
    #[error("Provider rejected the request (response_code {code}): {reason}")]
    ResponseCode { code: u32, reason: &'static str },
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Question provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Quiz session error: {0}")]
    Session(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
