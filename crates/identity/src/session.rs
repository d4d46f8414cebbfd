//! In-process session store.
//!
//! Sessions are opaque UUID tokens mapped to user ids. The cookie layer
//! carries the token; resolving an unknown or revoked token yields `None`
//! and the request proceeds as anonymous (fail-closed).

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::RwLock;

use uuid::Uuid;

use tableside_core::UserId;

/// Opaque session token handed to the client in the session cookie.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl core::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// In-memory session map.
///
/// Process-local: sessions do not survive a restart and are not shared
/// across nodes. Not optimized for large session counts.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, UserId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session for a user and return its token.
    pub fn issue(&self, user_id: UserId) -> SessionToken {
        let token = SessionToken::new();
        self.sessions
            .write()
            .expect("session lock poisoned")
            .insert(token.0, user_id);
        token
    }

    /// Resolve a token to the signed-in user, if the session is live.
    pub fn resolve(&self, token: &SessionToken) -> Option<UserId> {
        self.sessions
            .read()
            .expect("session lock poisoned")
            .get(&token.0)
            .copied()
    }

    /// Terminate a session. Unknown tokens are a no-op.
    pub fn revoke(&self, token: &SessionToken) {
        self.sessions
            .write()
            .expect("session lock poisoned")
            .remove(&token.0);
    }
}
