//! Location CRUD.
//!
//! List/Get are public. Create is admin-only. Update/Delete are allowed to
//! admins and to the location's current manager; non-admin updates can never
//! move the manager reference.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use tableside_auth::{authorize_location, effective_manager_id, LocationAction, PolicyError};
use tableside_core::{LocationId, UserId};
use tableside_infra::{LocationUpdate, NewLocation};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route(
            "/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
}

/// GET /api/locations — public.
pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.locations.list().await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(dto::LocationResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// GET /api/locations/{id} — public.
pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    match services.locations.get(LocationId::new(id)).await {
        Ok(Some(row)) => Json(dto::LocationResponse::from(row)).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /api/locations — admin only.
pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(body): Json<dto::LocationRequest>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    let caller = current.map(|Extension(u)| u.caller());
    if let Err(e) = authorize_location(caller.as_ref(), LocationAction::Create, None) {
        return errors::policy_error_to_response(e);
    }

    // ManagerId can be null, but if provided it must reference a real user.
    if let Some(manager_id) = body.manager_id() {
        match manager_exists(&services, manager_id).await {
            Ok(true) => {}
            Ok(false) => return errors::validation_error("unknown managerId"),
            Err(resp) => return resp,
        }
    }

    let created = match services
        .locations
        .insert(NewLocation {
            name: body.name,
            address: body.address,
            table_count: body.table_count,
            manager_id: body.manager_id.map(UserId::new),
        })
        .await
    {
        Ok(row) => row,
        Err(e) => return errors::store_error_to_response(e),
    };

    tracing::info!(location_id = %created.id, "location created");

    let location = format!("/api/locations/{}", created.id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto::LocationResponse::from(created)),
    )
        .into_response()
}

/// PUT /api/locations/{id} — admin or current manager.
pub async fn update_location(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<i32>,
    Json(body): Json<dto::LocationRequest>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    let id = LocationId::new(id);
    let existing = match services.locations.get(id).await {
        Ok(Some(row)) => row,
        Ok(None) => return errors::not_found(),
        Err(e) => return errors::store_error_to_response(e),
    };

    let Some(caller) = current.map(|Extension(u)| u.caller()) else {
        return errors::policy_error_to_response(PolicyError::Unauthenticated);
    };

    if let Err(e) = authorize_location(Some(&caller), LocationAction::Update, existing.manager_id) {
        return errors::policy_error_to_response(e);
    }

    // Admins may reassign the manager (validated below); for everyone else
    // the stored reference wins over whatever the client sent.
    let manager_id = effective_manager_id(&caller, body.manager_id(), existing.manager_id);

    if caller.is_admin() {
        if let Some(manager_id) = manager_id {
            match manager_exists(&services, manager_id).await {
                Ok(true) => {}
                Ok(false) => return errors::validation_error("unknown managerId"),
                Err(resp) => return resp,
            }
        }
    }

    let updated = match services
        .locations
        .update(
            id,
            LocationUpdate {
                name: body.name,
                address: body.address,
                table_count: body.table_count,
                manager_id,
            },
        )
        .await
    {
        Ok(Some(row)) => row,
        Ok(None) => return errors::not_found(),
        Err(e) => return errors::store_error_to_response(e),
    };

    Json(dto::LocationResponse::from(updated)).into_response()
}

/// DELETE /api/locations/{id} — admin or current manager.
pub async fn delete_location(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = LocationId::new(id);
    let existing = match services.locations.get(id).await {
        Ok(Some(row)) => row,
        Ok(None) => return errors::not_found(),
        Err(e) => return errors::store_error_to_response(e),
    };

    let caller = current.map(|Extension(u)| u.caller());
    if let Err(e) = authorize_location(caller.as_ref(), LocationAction::Delete, existing.manager_id)
    {
        return errors::policy_error_to_response(e);
    }

    match services.locations.delete(id).await {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => errors::not_found(),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn manager_exists(
    services: &AppServices,
    manager_id: UserId,
) -> Result<bool, axum::response::Response> {
    services
        .users
        .exists(manager_id)
        .await
        .map_err(errors::store_error_to_response)
}
