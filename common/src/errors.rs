// Error handling framework

use thiserror::Error;

/// Database-specific errors
///
/// A missing row is never an error here: lookups return `Ok(None)`, so callers
/// can always tell "nothing matched" apart from "the query failed".
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl DatabaseError {
    /// Short stable label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => "connection_failed",
            DatabaseError::HealthCheckFailed(_) => "health_check_failed",
            DatabaseError::QueryFailed(_) => "query_failed",
            DatabaseError::NotFound(_) => "not_found",
            DatabaseError::DuplicateKey(_) => "duplicate_key",
            DatabaseError::ForeignKeyViolation(_) => "foreign_key_violation",
            DatabaseError::MigrationFailed(_) => "migration_failed",
        }
    }
}

// Implement From for common external errors
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for specific database error codes
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateKey(db_err.message().to_string()),
                        "23503" => DatabaseError::ForeignKeyViolation(db_err.message().to_string()),
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionFailed(err.to_string())
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_pool_timeout_maps_to_connection_failed() {
        let err: DatabaseError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }

    #[test]
    fn test_other_errors_map_to_query_failed() {
        let err: DatabaseError = sqlx::Error::ColumnNotFound("average_rating".to_string()).into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
        assert!(err.to_string().contains("average_rating"));
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = DatabaseError::DuplicateKey("users_email_key".to_string());
        assert_eq!(
            err.to_string(),
            "Duplicate key violation: users_email_key"
        );
        assert_eq!(err.kind(), "duplicate_key");
    }
}
