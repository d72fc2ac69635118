//! User role repository.

use furnitureco_core::{NewUserRole, Role, UserId, UserRole};

use super::{decode_first, decode_rows, encode};
use crate::backend::{Caller, TableStore};
use crate::error::StoreError;
use crate::query::{Direction, Filter, Select, Table};

/// Repository for the `user_roles` table.
pub struct UserRoleRepository<'a> {
    store: &'a dyn TableStore,
    caller: Caller<'a>,
}

impl<'a> UserRoleRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn TableStore, caller: Caller<'a>) -> Self {
        Self { store, caller }
    }

    /// Whether a `(user, role)` row exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    pub async fn has_role(&self, user_id: UserId, role: Role) -> Result<bool, StoreError> {
        let query = Select::all()
            .eq("user_id", user_id)
            .eq("role", role)
            .limit(1);
        let rows = self
            .store
            .select(self.caller, Table::UserRoles, &query)
            .await?;
        Ok(decode_first::<UserRole>(rows)?.is_some())
    }

    /// Every user holding `role`, oldest grant first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list(&self, role: Role) -> Result<Vec<UserRole>, StoreError> {
        let query = Select::all()
            .eq("role", role)
            .order_by("created_at", Direction::Asc);
        decode_rows(
            self.store
                .select(self.caller, Table::UserRoles, &query)
                .await?,
        )
    }

    /// Grant a role. Granting a role the user already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert is rejected.
    pub async fn grant(&self, user_id: UserId, role: Role) -> Result<UserRole, StoreError> {
        let row = encode(&NewUserRole { user_id, role })?;
        let rows = self
            .store
            .upsert(self.caller, Table::UserRoles, "user_id,role", vec![row])
            .await?;
        decode_first(rows)?
            .ok_or_else(|| StoreError::InvalidResponse("upsert returned no row".to_string()))
    }

    /// Revoke a role. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected.
    pub async fn revoke(&self, user_id: UserId, role: Role) -> Result<bool, StoreError> {
        let rows = self
            .store
            .delete(
                self.caller,
                Table::UserRoles,
                &[Filter::eq("user_id", user_id), Filter::eq("role", role)],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}
