//! Store contracts shared by the in-memory and Postgres backends.

use async_trait::async_trait;
use thiserror::Error;

use tableside_core::{LocationId, UserId};

pub mod memory;
pub mod postgres;

/// Infrastructure-level store failure.
///
/// Deterministic business failures (not-found, validation) are expressed in
/// the trait signatures themselves; this enum only carries backend trouble,
/// which the API layer surfaces as a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A persisted location row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: String,
    pub address: String,
    pub table_count: i32,
    pub manager_id: Option<UserId>,
}

/// Payload for creating a location (id is store-assigned).
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub address: String,
    pub table_count: i32,
    pub manager_id: Option<UserId>,
}

/// Full-row replacement applied by an update.
#[derive(Debug, Clone)]
pub struct LocationUpdate {
    pub name: String,
    pub address: String,
    pub table_count: i32,
    pub manager_id: Option<UserId>,
}

/// A persisted user row (roles are resolved separately).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub user_name: String,
    pub password_hash: String,
}

/// Payload for provisioning a user (role memberships are added separately).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub password_hash: String,
}

/// Persistence for the `Location` aggregate.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError>;

    async fn get(&self, id: LocationId) -> Result<Option<LocationRecord>, StoreError>;

    async fn insert(&self, new: NewLocation) -> Result<LocationRecord, StoreError>;

    /// Replace the row. Returns `None` when the id is unknown.
    async fn update(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> Result<Option<LocationRecord>, StoreError>;

    /// Returns `false` when the id is unknown.
    async fn delete(&self, id: LocationId) -> Result<bool, StoreError>;
}

/// Persistence for users and role memberships (identity-provider shape).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive username lookup.
    async fn find_by_name(&self, user_name: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    async fn exists(&self, id: UserId) -> Result<bool, StoreError>;

    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError>;

    /// Grant role memberships. Role names must already exist; the caller
    /// validates them against `role_exists` first.
    async fn add_to_roles(&self, id: UserId, roles: &[String]) -> Result<(), StoreError>;

    async fn roles_of(&self, id: UserId) -> Result<Vec<String>, StoreError>;

    async fn role_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Idempotent role creation (seed support).
    async fn ensure_role(&self, name: &str) -> Result<(), StoreError>;
}
