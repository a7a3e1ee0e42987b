use crate::core::security;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;

/// Makes sure the configured administrator account exists and can log in with the configured
/// password. An existing account with another role is left untouched: roles never change.
pub(crate) async fn ensure_default_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.default_admin_password.is_empty() {
        tracing::warn!("DEFAULT_ADMIN_PASSWORD not configured; skipping admin creation");
        return Ok(());
    }

    let username = admin.default_admin_username.as_str();
    let existing = repositories::users::find_by_username(state.db(), username).await?;

    if let Some(user) = existing {
        if user.role != UserRole::Admin {
            tracing::error!(
                username,
                role = user.role.as_str(),
                "Default admin username is taken by a non-admin account"
            );
            return Ok(());
        }

        let verified =
            security::verify_password(&admin.default_admin_password, &user.password)
                .unwrap_or(false);
        if verified {
            tracing::info!("Default admin already up to date");
            return Ok(());
        }

        let hashed = security::hash_password(&admin.default_admin_password)?;
        repositories::users::update_password(state.db(), user.id, &hashed).await?;
        tracing::info!(username, "Reset default admin password");
        return Ok(());
    }

    let hashed = security::hash_password(&admin.default_admin_password)?;
    let user =
        repositories::users::create(state.db(), username, &hashed, UserRole::Admin).await?;

    tracing::info!(username, user_id = user.id, "Created default admin");
    Ok(())
}
