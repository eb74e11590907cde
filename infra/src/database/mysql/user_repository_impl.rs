//! MySQL implementation of the UserRepository trait.
//!
//! Every statement runs under the read or write timeout from
//! [`DatabaseConfig`]. Driver errors are logged here and surfaced to the
//! domain as [`StorageError`] values whose display text never contains the
//! driver message.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use ks_core::domain::entities::user::{NewUser, User, UserId};
use ks_core::errors::{AuthError, DomainError, StorageError};
use ks_core::repositories::UserRepository;

use crate::config::DatabaseConfig;
use crate::database::DatabasePool;

const SELECT_USER: &str = r#"
    SELECT id, email, password_hash, role, created_at
    FROM users
"#;

/// MySQL implementation of UserRepository
#[derive(Clone)]
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `config` - Supplies the per-statement read and write timeouts
    pub fn new(pool: MySqlPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            read_timeout: Duration::from_secs(config.read_timeout),
            write_timeout: Duration::from_secs(config.write_timeout),
        }
    }

    /// Create a repository sharing the connections of `pool`
    pub fn from_pool(pool: &DatabasePool) -> Self {
        Self::new(pool.get_pool().clone(), pool.config())
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: u64 = row.try_get("id").map_err(column_error)?;

        Ok(User {
            id: UserId(id),
            email: row.try_get("email").map_err(column_error)?,
            password_hash: row.try_get("password_hash").map_err(column_error)?,
            role: row.try_get("role").map_err(column_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
        })
    }

    async fn fetch_user<F>(&self, query: F) -> Result<Option<User>, DomainError>
    where
        F: Future<Output = Result<Option<sqlx::mysql::MySqlRow>, sqlx::Error>> + Send,
    {
        let row = bounded(self.read_timeout, query)
            .await?
            .map_err(storage_error)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_USER);

        self.fetch_user(
            sqlx::query(&query)
                .bind(id.value())
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE email = ? LIMIT 1", SELECT_USER);

        self.fetch_user(
            sqlx::query(&query)
                .bind(email.to_lowercase())
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?)
        "#;

        // MySQL stores second precision, keep the entity consistent with it
        let created_at = DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0)
            .unwrap_or_else(Utc::now);

        let result = bounded(
            self.write_timeout,
            sqlx::query(query)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.role)
                .bind(created_at)
                .execute(&self.pool),
        )
        .await?
        .map_err(|e| {
            if is_duplicate_key(&e) {
                tracing::debug!(email = %user.email, "Duplicate user rejected by store");
                DomainError::Auth(AuthError::UserAlreadyExists)
            } else {
                storage_error(e)
            }
        })?;

        let id = UserId(result.last_insert_id());
        tracing::info!(user_id = %id, "User created");

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at,
        })
    }

    async fn ping(&self) -> Result<(), DomainError> {
        bounded(self.read_timeout, sqlx::query("SELECT 1").execute(&self.pool))
            .await?
            .map_err(storage_error)?;
        Ok(())
    }
}

async fn bounded<F, T>(limit: Duration, query: F) -> Result<T, DomainError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, query).await.map_err(|_| {
        tracing::warn!(after_ms = limit.as_millis() as u64, "Database statement timed out");
        DomainError::Storage(StorageError::Timeout {
            after_ms: limit.as_millis() as u64,
        })
    })
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

fn storage_error(e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "Database query failed");
    let message = e.to_string();
    let error = match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StorageError::Unavailable { message },
        _ => StorageError::Query { message },
    };
    DomainError::Storage(error)
}

fn column_error(e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "Failed to decode user row");
    DomainError::Storage(StorageError::Query {
        message: e.to_string(),
    })
}
