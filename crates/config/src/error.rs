use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration from environment: {0}")]
    EnvError(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    ValidateError(String),

    #[error("Fee configuration error: {0}")]
    FeeError(#[from] crate::fee::FeeConfigError),
}
