use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String, // argon2 hash, never serialized outward
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>, // normalized to 10 digits before storage
    pub membership_level: String,
    pub membership_code: Option<String>,
    pub points: i64,
    pub joined_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
    pub is_active: bool,
}
