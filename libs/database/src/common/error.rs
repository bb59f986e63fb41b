/// Error type for connection-level database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver error surfaced by SeaORM
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection could not be established after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Liveness query did not succeed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    MigrationError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
