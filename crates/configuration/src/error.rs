use thiserror::Error;

/// Failures while assembling settings or installing the log subscriber.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file or an environment override could not be read or parsed.
    #[error("Could not read settings: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid setting: {0}")]
    ValidationError(String),

    #[error("Could not set up logging: {0}")]
    LoggingError(String),
}
