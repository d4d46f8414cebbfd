use serde::{Deserialize, Serialize};

use tableside_core::{DomainError, DomainResult, UserId};
use tableside_infra::{LocationRecord, UserRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.user_name.trim().is_empty() {
            return Err(DomainError::validation("userName is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        if self.roles.is_empty() {
            return Err(DomainError::validation("at least one role is required"));
        }
        Ok(())
    }
}

/// Payload for both Create and Update of a location.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub name: String,
    pub address: String,
    pub table_count: i32,
    #[serde(default)]
    pub manager_id: Option<i32>,
}

impl LocationRequest {
    /// Shape-only validation; manager existence needs the store and is
    /// checked by the handler after the policy gate.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.name.len() > 120 {
            return Err(DomainError::validation("name must be at most 120 characters"));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::validation("address is required"));
        }
        if self.table_count < 1 {
            return Err(DomainError::validation("tableCount must be at least 1"));
        }
        Ok(())
    }

    pub fn manager_id(&self) -> Option<UserId> {
        self.manager_id.map(UserId::new)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub table_count: i32,
    pub manager_id: Option<i32>,
}

impl From<LocationRecord> for LocationResponse {
    fn from(record: LocationRecord) -> Self {
        Self {
            id: record.id.as_i32(),
            name: record.name,
            address: record.address,
            table_count: record.table_count,
            manager_id: record.manager_id.map(|m| m.as_i32()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub user_name: String,
    pub roles: Vec<String>,
}

impl UserResponse {
    pub fn new(record: &UserRecord, roles: Vec<String>) -> Self {
        Self {
            id: record.id.as_i32(),
            user_name: record.user_name.clone(),
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, address: &str, table_count: i32) -> LocationRequest {
        LocationRequest {
            name: name.to_string(),
            address: address.to_string(),
            table_count,
            manager_id: None,
        }
    }

    #[test]
    fn valid_location_passes() {
        assert!(request("Loc A", "1 St", 5).validate().is_ok());
    }

    #[test]
    fn table_count_below_one_is_rejected() {
        assert!(request("Loc A", "1 St", 0).validate().is_err());
        assert!(request("Loc A", "1 St", -3).validate().is_err());
    }

    #[test]
    fn blank_name_and_address_are_rejected() {
        assert!(request("", "1 St", 5).validate().is_err());
        assert!(request("  ", "1 St", 5).validate().is_err());
        assert!(request("Loc A", "", 5).validate().is_err());
    }

    #[test]
    fn overlong_name_is_rejected() {
        assert!(request(&"x".repeat(121), "1 St", 5).validate().is_err());
        assert!(request(&"x".repeat(120), "1 St", 5).validate().is_ok());
    }

    #[test]
    fn user_request_requires_roles() {
        let req = CreateUserRequest {
            user_name: "bob".into(),
            password: "Password123!".into(),
            roles: vec![],
        };
        assert!(req.validate().is_err());
    }
}
