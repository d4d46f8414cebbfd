//! Idempotent startup bootstrap: default roles, users, and sample locations.

use tableside_auth::roles::{ADMIN_ROLE, USER_ROLE};
use tableside_identity::hash_password;
use tableside_infra::{NewLocation, NewUser};

use crate::app::services::AppServices;

/// Run the seed. Safe to run on every process start.
pub async fn run(services: &AppServices) -> anyhow::Result<()> {
    services.users.ensure_role(ADMIN_ROLE).await?;
    services.users.ensure_role(USER_ROLE).await?;

    ensure_user(services, "galkadi", "Password123!", ADMIN_ROLE).await?;
    ensure_user(services, "bob", "Password123!", USER_ROLE).await?;
    ensure_user(services, "sue", "Password123!", USER_ROLE).await?;

    if services.locations.list().await?.is_empty() {
        for (name, address, table_count) in [
            ("Location 1", "123 Main St", 10),
            ("Location 2", "456 Oak Ave", 20),
            ("Location 3", "789 Pine Ln", 15),
        ] {
            services
                .locations
                .insert(NewLocation {
                    name: name.to_string(),
                    address: address.to_string(),
                    table_count,
                    manager_id: None,
                })
                .await?;
        }
        tracing::info!("seeded sample locations");
    }

    Ok(())
}

async fn ensure_user(
    services: &AppServices,
    user_name: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let user = match services.users.find_by_name(user_name).await? {
        Some(user) => user,
        None => {
            let password_hash = hash_password(password)?;
            let user = services
                .users
                .create(NewUser {
                    user_name: user_name.to_string(),
                    password_hash,
                })
                .await?;
            tracing::info!(user_id = %user.id, user_name, "seeded user");
            user
        }
    };

    let roles = services.users.roles_of(user.id).await?;
    if !roles.iter().any(|r| r == role) {
        services
            .users
            .add_to_roles(user.id, &[role.to_string()])
            .await?;
    }

    Ok(())
}
