use tableside_core::UserId;

use crate::roles::{Role, ADMIN_ROLE};

/// A fully resolved authenticated caller for authorization decisions.
///
/// Construction of this object is intentionally decoupled from storage and
/// transport: the API layer derives it from the session cookie, tests build
/// it directly. An anonymous request is represented as `Option::<Caller>::None`
/// at the policy boundary, never as a `Caller` with made-up fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    /// Whether this caller holds the "Admin" role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.as_str() == ADMIN_ROLE)
    }
}
