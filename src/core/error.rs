use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColonyError {
    #[error("Oracle error: {0}")]
    OracleError(String),

    #[error("Oracle timed out after {0:?}")]
    OracleTimeout(std::time::Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ColonyError>;
