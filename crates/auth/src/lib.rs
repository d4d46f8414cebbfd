//! `tableside-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the policy
//! evaluator works over an explicit caller context and the target's stored
//! state, nothing else.

pub mod caller;
pub mod policy;
pub mod roles;

pub use caller::Caller;
pub use policy::{
    authorize_location, effective_manager_id, require_admin, LocationAction, PolicyError,
};
pub use roles::Role;
