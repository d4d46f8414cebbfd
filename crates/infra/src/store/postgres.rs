//! Postgres-backed store implementations.
//!
//! All queries are runtime-bound (no compile-time database dependency) and
//! operate on single rows; the schema lives in the api crate's migrations.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use tableside_core::{LocationId, UserId};

use super::{
    LocationRecord, LocationStore, LocationUpdate, NewLocation, NewUser, StoreError, UserRecord,
    UserStore,
};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

fn location_from_row(row: &sqlx::postgres::PgRow) -> Result<LocationRecord, sqlx::Error> {
    Ok(LocationRecord {
        id: LocationId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        table_count: row.try_get("table_count")?,
        manager_id: row
            .try_get::<Option<i32>, _>("manager_id")?
            .map(UserId::new),
    })
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: UserId::new(row.try_get("id")?),
        user_name: row.try_get("user_name")?,
        password_hash: row.try_get("password_hash")?,
    })
}

/// `LocationStore` over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresLocationStore {
    pool: PgPool,
}

impl PostgresLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for PostgresLocationStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, address, table_count, manager_id
            FROM locations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| location_from_row(row).map_err(StoreError::from))
            .collect()
    }

    #[instrument(skip(self))]
    async fn get(&self, id: LocationId) -> Result<Option<LocationRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, address, table_count, manager_id
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(location_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self, new))]
    async fn insert(&self, new: NewLocation) -> Result<LocationRecord, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO locations (name, address, table_count, manager_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, address, table_count, manager_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.address)
        .bind(new.table_count)
        .bind(new.manager_id.map(|m| m.as_i32()))
        .fetch_one(&self.pool)
        .await?;

        location_from_row(&row).map_err(StoreError::from)
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> Result<Option<LocationRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE locations
            SET name = $2, address = $3, table_count = $4, manager_id = $5
            WHERE id = $1
            RETURNING id, name, address, table_count, manager_id
            "#,
        )
        .bind(id.as_i32())
        .bind(&update.name)
        .bind(&update.address)
        .bind(update.table_count)
        .bind(update.manager_id.map(|m| m.as_i32()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(location_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: LocationId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// `UserStore` over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, user_name: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_name, password_hash
            FROM users
            WHERE LOWER(user_name) = LOWER($1)
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_name, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StoreError::from)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    #[instrument(skip(self, new))]
    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (user_name, password_hash)
            VALUES ($1, $2)
            RETURNING id, user_name, password_hash
            "#,
        )
        .bind(&new.user_name)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row).map_err(StoreError::from)
    }

    #[instrument(skip(self, roles))]
    async fn add_to_roles(&self, id: UserId, roles: &[String]) -> Result<(), StoreError> {
        // All memberships of one grant commit in a single transaction.
        let mut tx = self.pool.begin().await?;

        for role in roles {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                SELECT $1, id FROM roles WHERE name = $2
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id.as_i32())
            .bind(role)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn roles_of(&self, id: UserId) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(StoreError::from))
            .collect()
    }

    #[instrument(skip(self))]
    async fn role_exists(&self, name: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    #[instrument(skip(self))]
    async fn ensure_role(&self, name: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
