//! Admin-only user provisioning.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::post, Json, Router};

use tableside_auth::require_admin;
use tableside_identity::hash_password;
use tableside_infra::NewUser;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/", post(create_user))
}

/// POST /api/users
///
/// Roles must be non-empty and each must exist; usernames are unique
/// case-insensitively.
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    let caller = current.map(|Extension(u)| u.caller());
    if let Err(e) = require_admin(caller.as_ref()) {
        return errors::policy_error_to_response(e);
    }

    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    for role in &body.roles {
        match services.users.role_exists(role).await {
            Ok(true) => {}
            Ok(false) => return errors::validation_error("unknown role"),
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    match services.users.find_by_name(&body.user_name).await {
        Ok(Some(_)) => return errors::validation_error("userName is taken"),
        Ok(None) => {}
        Err(e) => return errors::store_error_to_response(e),
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return errors::validation_error("password was rejected");
        }
    };

    let user = match services
        .users
        .create(NewUser {
            user_name: body.user_name.clone(),
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = services.users.add_to_roles(user.id, &body.roles).await {
        return errors::store_error_to_response(e);
    }

    tracing::info!(user_id = %user.id, "user provisioned");
    Json(dto::UserResponse::new(&user, body.roles)).into_response()
}
