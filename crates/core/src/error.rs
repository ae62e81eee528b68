use thiserror::Error;

pub type AdlensResult<T> = Result<T, AdlensError>;

#[derive(Error, Debug)]
pub enum AdlensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AdlensError {
    fn from(err: config::ConfigError) -> Self {
        AdlensError::Config(err.to_string())
    }
}
