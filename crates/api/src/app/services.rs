use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use tableside_identity::SessionStore;
use tableside_infra::{
    InMemoryLocationStore, InMemoryUserStore, LocationStore, PostgresLocationStore,
    PostgresUserStore, UserStore,
};

/// Shared services behind the handlers: the two stores and the session map.
pub struct AppServices {
    pub locations: Arc<dyn LocationStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppServices {
    /// In-memory wiring (tests/dev).
    pub fn in_memory() -> Self {
        Self {
            locations: Arc::new(InMemoryLocationStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Postgres wiring over a shared pool.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            locations: Arc::new(PostgresLocationStore::new(pool.clone())),
            users: Arc::new(PostgresUserStore::new(pool)),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Build services from the environment: `DATABASE_URL` selects Postgres
/// (schema applied on startup), otherwise everything is in-memory.
pub async fn build_services() -> anyhow::Result<AppServices> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new().connect(&url).await?;
            // Idempotent DDL; the statements are all IF NOT EXISTS.
            sqlx::raw_sql(include_str!("../../migrations/0001_init.sql"))
                .execute(&pool)
                .await?;
            Ok(AppServices::postgres(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory())
        }
    }
}
