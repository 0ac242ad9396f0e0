use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::SqliteUserStore;
use crate::auth::service::AuthService;
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(pool, config))
    }

    pub fn from_parts(pool: SqlitePool, config: Arc<AppConfig>) -> Self {
        let store = Arc::new(SqliteUserStore::new(pool.clone()));
        let auth = Arc::new(AuthService::new(store, JwtKeys::new(&config.jwt)));
        Self {
            db: pool,
            config,
            auth,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use sqlx::sqlite::SqlitePoolOptions;

        // Lazily connecting pool so unit tests never touch a real database.
        let pool = SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy pool should construct");
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
            },
        });
        Self::from_parts(pool, config)
    }
}
