//! `tableside-infra` — persistence adapters.
//!
//! Store traits plus two interchangeable implementations: in-memory
//! (tests/dev) and Postgres (sqlx). Handlers only see the traits.

pub mod store;

pub use store::{
    LocationRecord, LocationStore, LocationUpdate, NewLocation, NewUser, StoreError, UserRecord,
    UserStore,
};
pub use store::memory::{InMemoryLocationStore, InMemoryUserStore};
pub use store::postgres::{PostgresLocationStore, PostgresUserStore};
