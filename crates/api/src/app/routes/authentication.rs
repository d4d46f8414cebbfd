//! Cookie sign-in, current-user lookup, and sign-out.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use tableside_identity::{verify_password, SessionToken};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;
use crate::middleware::SESSION_COOKIE;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

/// POST /api/authentication/login
///
/// Unknown user and wrong password both answer a plain 400; the response
/// must not reveal which one it was.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.users.find_by_name(&body.user_name).await {
        Ok(Some(user)) => user,
        Ok(None) => return errors::validation_error("bad credentials"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if !verify_password(&body.password, &user.password_hash) {
        return errors::validation_error("bad credentials");
    }

    let roles = match services.users.roles_of(user.id).await {
        Ok(roles) => roles,
        Err(e) => return errors::store_error_to_response(e),
    };

    let token = services.sessions.issue(user.id);
    tracing::info!(user_id = %user.id, "user signed in");

    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build();

    (
        jar.add(cookie),
        Json(dto::UserResponse::new(&user, roles)),
    )
        .into_response()
}

/// GET /api/authentication/me
pub async fn me(current: Option<Extension<CurrentUser>>) -> axum::response::Response {
    let Some(Extension(current)) = current else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required");
    };

    Json(serde_json::json!({
        "id": current.id.as_i32(),
        "userName": current.user_name,
        "roles": current.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
    .into_response()
}

/// POST /api/authentication/logout
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    jar: CookieJar,
) -> axum::response::Response {
    if current.is_none() {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required");
    }

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = cookie.value().parse::<SessionToken>() {
            services.sessions.revoke(&token);
        }
    }

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");

    (jar.remove(removal), StatusCode::OK).into_response()
}
