use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisConfig, DatabaseSettings, LoggingSettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `TICKERSCOPE__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "TICKERSCOPE";

/// Loads the application settings.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `TICKERSCOPE__*` environment variables. A database URL missing
/// from all of those is taken from `DATABASE_URL`. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut settings = builder.try_deserialize::<Settings>()?;

    if settings.database.url.is_none() {
        settings.database.url = std::env::var("DATABASE_URL").ok();
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_config(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.analysis.peer_concurrency, 8);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [database]
            url = "postgres://localhost/prices"
            max_connections = 4

            [analysis]
            peer_concurrency = 2
            "#
        )
        .unwrap();

        let settings = load_config(file.path()).unwrap();
        assert_eq!(
            settings.database.url.as_deref(),
            Some("postgres://localhost/prices")
        );
        assert_eq!(settings.database.max_connections, 4);
        assert_eq!(settings.database.acquire_timeout_secs, 5);
        assert_eq!(settings.analysis.peer_concurrency, 2);
    }

    #[test]
    fn zero_peer_concurrency_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[analysis]\npeer_concurrency = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
