//! Admin role management commands.
//!
//! # Usage
//!
//! ```bash
//! fco-cli admin grant --user-id <uuid>
//! fco-cli admin revoke --user-id <uuid>
//! fco-cli admin list
//! ```
//!
//! The user must already exist in the auth service (e.g. via the sign-up
//! form on the admin login screen); these commands only manage the role row.

use furnitureco_core::{Role, UserId, UserRole};
use furnitureco_store::{Caller, StoreError, TableStore, UserRoleRepository};

/// Grant the admin role. Re-granting is a no-op.
///
/// # Errors
///
/// Returns an error if the write is rejected.
pub async fn grant(
    store: &dyn TableStore,
    caller: Caller<'_>,
    user_id: UserId,
) -> Result<UserRole, StoreError> {
    let row = UserRoleRepository::new(store, caller)
        .grant(user_id, Role::Admin)
        .await?;
    tracing::info!(%user_id, "Admin role granted");
    Ok(row)
}

/// Revoke the admin role. Returns whether the user held it.
///
/// The user's current admin session stays valid until they sign out.
///
/// # Errors
///
/// Returns an error if the delete is rejected.
pub async fn revoke(
    store: &dyn TableStore,
    caller: Caller<'_>,
    user_id: UserId,
) -> Result<bool, StoreError> {
    let removed = UserRoleRepository::new(store, caller)
        .revoke(user_id, Role::Admin)
        .await?;
    if removed {
        tracing::info!(%user_id, "Admin role revoked");
    } else {
        tracing::warn!(%user_id, "User did not hold the admin role");
    }
    Ok(removed)
}

/// Log every admin user ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list(store: &dyn TableStore, caller: Caller<'_>) -> Result<Vec<UserRole>, StoreError> {
    let admins = UserRoleRepository::new(store, caller)
        .list(Role::Admin)
        .await?;

    tracing::info!("Admin users: {}", admins.len());
    for admin in &admins {
        tracing::info!("  {}", admin.user_id);
    }
    Ok(admins)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use furnitureco_store::AuthProvider;
    use furnitureco_store::memory::MemoryBackend;
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn test_grant_then_revoke() {
        let backend = MemoryBackend::new();
        let owner = backend
            .create_user("owner@furnitureco.com", "hunter22")
            .await
            .unwrap();
        backend.grant_role(owner, Role::Admin).await.unwrap();
        let token = backend
            .sign_in_with_password(
                &"owner@furnitureco.com".parse().unwrap(),
                &SecretString::from("hunter22".to_string()),
            )
            .await
            .unwrap()
            .access_token;
        let caller = Caller::Bearer(&token);

        let staff = backend
            .create_user("staff@furnitureco.com", "hunter22")
            .await
            .unwrap();

        let granted = grant(&backend, caller, staff).await.unwrap();
        assert_eq!(granted.user_id, staff);
        // Re-granting keeps a single row
        grant(&backend, caller, staff).await.unwrap();

        assert!(revoke(&backend, caller, staff).await.unwrap());
        assert!(!revoke(&backend, caller, staff).await.unwrap());
    }
}
