//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use tableside_core::{LocationId, UserId};

use super::{
    LocationRecord, LocationStore, LocationUpdate, NewLocation, NewUser, StoreError, UserRecord,
    UserStore,
};

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

/// In-memory location table keyed by id (ordered, so listing is stable).
#[derive(Debug)]
pub struct InMemoryLocationStore {
    rows: RwLock<BTreeMap<i32, LocationRecord>>,
    next_id: AtomicI32,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }

    async fn get(&self, id: LocationId) -> Result<Option<LocationRecord>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&id.as_i32()).cloned())
    }

    async fn insert(&self, new: NewLocation) -> Result<LocationRecord, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = LocationRecord {
            id: LocationId::new(id),
            name: new.name,
            address: new.address,
            table_count: new.table_count,
            manager_id: new.manager_id,
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: LocationId,
        update: LocationUpdate,
    ) -> Result<Option<LocationRecord>, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let Some(row) = rows.get_mut(&id.as_i32()) else {
            return Ok(None);
        };

        row.name = update.name;
        row.address = update.address;
        row.table_count = update.table_count;
        row.manager_id = update.manager_id;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: LocationId) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.remove(&id.as_i32()).is_some())
    }
}

/// In-memory users/roles/memberships, mirroring the relational shape.
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<i32, UserRecord>>,
    memberships: RwLock<HashMap<i32, Vec<String>>>,
    roles: RwLock<HashSet<String>>,
    next_id: AtomicI32,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            memberships: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashSet::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        let wanted = user_name.to_lowercase();
        Ok(users
            .values()
            .find(|u| u.user_name.to_lowercase() == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id.as_i32()).cloned())
    }

    async fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.contains_key(&id.as_i32()))
    }

    async fn create(&self, new: NewUser) -> Result<UserRecord, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = UserRecord {
            id: UserId::new(id),
            user_name: new.user_name,
            password_hash: new.password_hash,
        };

        let mut users = self.users.write().map_err(|_| poisoned())?;
        users.insert(id, record.clone());
        Ok(record)
    }

    async fn add_to_roles(&self, id: UserId, roles: &[String]) -> Result<(), StoreError> {
        let mut memberships = self.memberships.write().map_err(|_| poisoned())?;
        let granted = memberships.entry(id.as_i32()).or_default();
        for role in roles {
            if !granted.contains(role) {
                granted.push(role.clone());
            }
        }
        Ok(())
    }

    async fn roles_of(&self, id: UserId) -> Result<Vec<String>, StoreError> {
        let memberships = self.memberships.read().map_err(|_| poisoned())?;
        Ok(memberships.get(&id.as_i32()).cloned().unwrap_or_default())
    }

    async fn role_exists(&self, name: &str) -> Result<bool, StoreError> {
        let roles = self.roles.read().map_err(|_| poisoned())?;
        Ok(roles.contains(name))
    }

    async fn ensure_role(&self, name: &str) -> Result<(), StoreError> {
        let mut roles = self.roles.write().map_err(|_| poisoned())?;
        roles.insert(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn location_crud_round_trip() {
        let store = InMemoryLocationStore::new();

        let created = store
            .insert(NewLocation {
                name: "Loc A".into(),
                address: "1 St".into(),
                table_count: 5,
                manager_id: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, LocationId::new(1));

        let updated = store
            .update(
                created.id,
                LocationUpdate {
                    name: "Loc A2".into(),
                    address: "1 St".into(),
                    table_count: 6,
                    manager_id: Some(UserId::new(7)),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.table_count, 6);
        assert_eq!(updated.manager_id, Some(UserId::new(7)));

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_unknown_location_is_none() {
        let store = InMemoryLocationStore::new();
        let result = store
            .update(
                LocationId::new(99),
                LocationUpdate {
                    name: "x".into(),
                    address: "y".into(),
                    table_count: 1,
                    manager_id: None,
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn username_lookup_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        store.ensure_role("User").await.unwrap();
        let created = store
            .create(NewUser {
                user_name: "Bob".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        store
            .add_to_roles(created.id, &["User".to_string()])
            .await
            .unwrap();

        let found = store.find_by_name("bOB").await.unwrap().unwrap();
        assert_eq!(found.user_name, "Bob");
        assert_eq!(store.roles_of(found.id).await.unwrap(), vec!["User".to_string()]);
    }

    #[tokio::test]
    async fn roles_exist_only_after_ensure() {
        let store = InMemoryUserStore::new();
        assert!(!store.role_exists("Admin").await.unwrap());
        store.ensure_role("Admin").await.unwrap();
        store.ensure_role("Admin").await.unwrap();
        assert!(store.role_exists("Admin").await.unwrap());
    }
}
