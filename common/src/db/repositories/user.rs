// User repository implementation

use super::queries::user_queries;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{normalize_email, NewUser, User};
use tracing::instrument;

/// Repository for user-related database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user and return it with its generated id
    ///
    /// The email is stored lowercased. No existence check is made first; the
    /// unique constraint on `users.email` reports duplicates as
    /// `DatabaseError::DuplicateKey`.
    #[instrument(skip(self, user))]
    pub async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            user_queries::SELECT_ALL_COLUMNS
        ))
        .bind(&user.name)
        .bind(normalize_email(&user.email))
        .bind(&user.password)
        .fetch_one(self.pool.pool())
        .await?;

        tracing::info!(user_id = created.id, "User created");
        Ok(created)
    }

    /// Find a user by email, ignoring case
    #[instrument(skip(self, email))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE email = $1
            "#,
            user_queries::SELECT_ALL_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(self.pool.pool())
        .await?;

        tracing::debug!(found = user.is_some(), "Looked up user by email");
        Ok(user)
    }

    /// Find a user by ID
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users
            WHERE id = $1
            "#,
            user_queries::SELECT_ALL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(user)
    }
}
