//! `tableside-identity` — credential and session collaborators.
//!
//! The policy core treats identity as an external service; this crate is
//! that service's in-process edge: password hashing/verification and the
//! session token store the cookie layer resolves against.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{SessionStore, SessionToken};
