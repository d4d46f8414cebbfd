//! Session-cookie middleware.
//!
//! Resolves the session cookie to a `CurrentUser` request extension. It never
//! rejects: anonymous and unresolvable sessions simply attach nothing, and
//! the policy evaluator decides per operation whether that is acceptable
//! (fail-closed — a session that cannot be resolved is anonymous).

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use tableside_auth::Role;
use tableside_identity::SessionToken;

use crate::app::services::AppServices;
use crate::context::CurrentUser;

/// Name of the session cookie issued on login.
pub const SESSION_COOKIE: &str = "tableside_session";

pub async fn session_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = resolve_session(&services, req.headers()).await {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

async fn resolve_session(services: &AppServices, headers: &HeaderMap) -> Option<CurrentUser> {
    let jar = CookieJar::from_headers(headers);
    let token: SessionToken = jar.get(SESSION_COOKIE)?.value().parse().ok()?;

    let user_id = services.sessions.resolve(&token)?;

    let record = match services.users.find_by_id(user_id).await {
        Ok(record) => record?,
        Err(err) => {
            tracing::warn!(%user_id, error = %err, "session user lookup failed");
            return None;
        }
    };

    let roles = match services.users.roles_of(user_id).await {
        Ok(roles) => roles,
        Err(err) => {
            tracing::warn!(%user_id, error = %err, "session role lookup failed");
            return None;
        }
    };

    Some(CurrentUser::new(
        record.id,
        record.user_name,
        roles.into_iter().map(Role::new).collect(),
    ))
}
