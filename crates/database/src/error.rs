use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConnectionConfigError(#[from] configuration::error::ConfigError),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] core_types::CoreError),

    #[error("The requested data was not found in the database.")]
    NotFound,

    #[error("A record with key '{0}' already exists.")]
    Duplicate(String),
}
