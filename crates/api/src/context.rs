use tableside_auth::{Caller, Role};
use tableside_core::UserId;

/// The signed-in user attached to a request by the session middleware.
///
/// Absent from the request extensions when no (valid) session cookie was
/// presented; handlers see that as `None` and the policy treats it as
/// unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub user_name: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn new(id: UserId, user_name: String, roles: Vec<Role>) -> Self {
        Self {
            id,
            user_name,
            roles,
        }
    }

    /// The policy-facing view of this user.
    pub fn caller(&self) -> Caller {
        Caller::new(self.id, self.roles.clone())
    }
}
