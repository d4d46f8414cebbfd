//! Location mutation policy.
//!
//! Decides, for a given (caller, action, target manager), one of
//! Allow / deny-as-unauthenticated / deny-as-forbidden.
//!
//! - No IO
//! - No panics
//! - No business validation (table counts etc. are checked before this)

use thiserror::Error;

use tableside_core::UserId;

use crate::caller::Caller;

/// The operation being attempted against a location.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationAction {
    Read,
    Create,
    Update,
    Delete,
}

/// Terminal policy denial. All denials end the request; there is no retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// No established identity (maps to HTTP 401).
    #[error("unauthenticated")]
    Unauthenticated,

    /// Identity established but rights are insufficient (maps to HTTP 403).
    #[error("forbidden")]
    Forbidden,
}

/// Authorize a location operation.
///
/// `manager_id` is the *stored* manager of the target location (`None` for
/// Create, where no target exists yet, and for unmanaged locations).
///
/// Rules:
/// - Read is open to everyone, anonymous callers included.
/// - Create requires the Admin role.
/// - Update/Delete require Admin, or that the caller is the current manager.
pub fn authorize_location(
    caller: Option<&Caller>,
    action: LocationAction,
    manager_id: Option<UserId>,
) -> Result<(), PolicyError> {
    if action == LocationAction::Read {
        return Ok(());
    }

    let caller = caller.ok_or(PolicyError::Unauthenticated)?;

    if caller.is_admin() {
        return Ok(());
    }

    match action {
        LocationAction::Read => Ok(()),
        LocationAction::Create => Err(PolicyError::Forbidden),
        LocationAction::Update | LocationAction::Delete => {
            if manager_id == Some(caller.user_id) {
                Ok(())
            } else {
                Err(PolicyError::Forbidden)
            }
        }
    }
}

/// Resolve the manager id that may actually be persisted by an update.
///
/// Non-admin callers never reassign managers: whatever they submitted is
/// silently replaced with the stored value. Admin-submitted values pass
/// through (existence of the referenced user is validated by the caller).
pub fn effective_manager_id(
    caller: &Caller,
    requested: Option<UserId>,
    stored: Option<UserId>,
) -> Option<UserId> {
    if caller.is_admin() {
        requested
    } else {
        stored
    }
}

/// Gate for admin-only operations that have no location target
/// (user provisioning).
pub fn require_admin(caller: Option<&Caller>) -> Result<(), PolicyError> {
    let caller = caller.ok_or(PolicyError::Unauthenticated)?;
    if caller.is_admin() {
        Ok(())
    } else {
        Err(PolicyError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    fn admin(id: i32) -> Caller {
        Caller::new(UserId::new(id), vec![Role::admin()])
    }

    fn member(id: i32) -> Caller {
        Caller::new(UserId::new(id), vec![Role::user()])
    }

    #[test]
    fn read_is_open_to_everyone() {
        assert!(authorize_location(None, LocationAction::Read, None).is_ok());
        assert!(authorize_location(Some(&member(7)), LocationAction::Read, Some(UserId::new(3))).is_ok());
    }

    #[test]
    fn create_requires_a_session() {
        assert_eq!(
            authorize_location(None, LocationAction::Create, None),
            Err(PolicyError::Unauthenticated)
        );
    }

    #[test]
    fn create_requires_admin() {
        assert_eq!(
            authorize_location(Some(&member(7)), LocationAction::Create, None),
            Err(PolicyError::Forbidden)
        );
        assert!(authorize_location(Some(&admin(1)), LocationAction::Create, None).is_ok());
    }

    #[test]
    fn anonymous_mutation_is_unauthenticated_regardless_of_ownership() {
        for action in [LocationAction::Update, LocationAction::Delete] {
            assert_eq!(
                authorize_location(None, action, Some(UserId::new(7))),
                Err(PolicyError::Unauthenticated)
            );
            assert_eq!(
                authorize_location(None, action, None),
                Err(PolicyError::Unauthenticated)
            );
        }
    }

    #[test]
    fn admin_may_mutate_any_location() {
        for action in [LocationAction::Update, LocationAction::Delete] {
            assert!(authorize_location(Some(&admin(1)), action, Some(UserId::new(7))).is_ok());
            assert!(authorize_location(Some(&admin(1)), action, None).is_ok());
        }
    }

    #[test]
    fn manager_may_mutate_their_own_location() {
        for action in [LocationAction::Update, LocationAction::Delete] {
            assert!(authorize_location(Some(&member(7)), action, Some(UserId::new(7))).is_ok());
        }
    }

    #[test]
    fn non_manager_member_is_forbidden() {
        for action in [LocationAction::Update, LocationAction::Delete] {
            assert_eq!(
                authorize_location(Some(&member(8)), action, Some(UserId::new(7))),
                Err(PolicyError::Forbidden)
            );
            // Unmanaged location: no member may touch it.
            assert_eq!(
                authorize_location(Some(&member(8)), action, None),
                Err(PolicyError::Forbidden)
            );
        }
    }

    #[test]
    fn non_admin_updates_keep_the_stored_manager() {
        let bob = member(7);
        assert_eq!(
            effective_manager_id(&bob, Some(UserId::new(99)), Some(UserId::new(7))),
            Some(UserId::new(7))
        );
        assert_eq!(effective_manager_id(&bob, None, Some(UserId::new(7))), Some(UserId::new(7)));
    }

    #[test]
    fn admin_updates_pass_the_requested_manager_through() {
        let root = admin(1);
        assert_eq!(
            effective_manager_id(&root, Some(UserId::new(9)), Some(UserId::new(7))),
            Some(UserId::new(9))
        );
        assert_eq!(effective_manager_id(&root, None, Some(UserId::new(7))), None);
    }

    #[test]
    fn user_provisioning_is_admin_only() {
        assert_eq!(require_admin(None), Err(PolicyError::Unauthenticated));
        assert_eq!(require_admin(Some(&member(7))), Err(PolicyError::Forbidden));
        assert!(require_admin(Some(&admin(1))).is_ok());
    }
}
