use axum::Router;

pub mod authentication;
pub mod locations;
pub mod system;
pub mod users;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/authentication", authentication::router())
        .nest("/users", users::router())
        .nest("/locations", locations::router())
}
