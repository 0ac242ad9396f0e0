use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;
use time::OffsetDateTime;

use crate::auth::repo_types::User;
use crate::errors::AuthError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (email, membership code) rejected the write.
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            // The only unique column this service writes is email, so a
            // constraint rejection always means a concurrent registration won.
            StoreError::Duplicate => AuthError::EmailExists,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}

/// Storage boundary for user records. The service only sees this trait, so
/// tests can swap in an in-memory double.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError>;
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn save_profile(&self, user: &User) -> Result<(), StoreError>;
    async fn touch_last_login(&self, id: i64, at: OffsetDateTime) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     membership_level, membership_code, points, joined_at, created_at, updated_at, \
     last_login_at, is_active";

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let now = OffsetDateTime::now_utc();
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)?;
        Ok(user)
    }

    async fn save_profile(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET first_name = ?1, last_name = ?2, phone = ?3, updated_at = ?4 \
             WHERE id = ?5",
        )
        .bind(user.first_name.as_deref())
        .bind(user.last_name.as_deref())
        .bind(user.phone.as_deref())
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn touch_last_login(&self, id: i64, at: OffsetDateTime) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login_at = ?1 WHERE id = ?2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
