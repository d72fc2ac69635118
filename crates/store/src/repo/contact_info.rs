//! Contact info repository.

use furnitureco_core::{ContactInfo, ContactInfoId, ContactInfoUpdate};

use super::{decode_first, decode_rows, encode};
use crate::backend::{Caller, TableStore};
use crate::error::StoreError;
use crate::query::{Filter, Select, Table};

/// Repository for the `contact_info` singleton.
pub struct ContactInfoRepository<'a> {
    store: &'a dyn TableStore,
    caller: Caller<'a>,
}

impl<'a> ContactInfoRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn TableStore, caller: Caller<'a>) -> Self {
        Self { store, caller }
    }

    /// The singleton row, if it has been seeded.
    ///
    /// Should the table ever hold more than one row, the first is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn get(&self) -> Result<Option<ContactInfo>, StoreError> {
        let rows = self
            .store
            .select(self.caller, Table::ContactInfo, &Select::all().limit(2))
            .await?;
        if rows.len() > 1 {
            tracing::warn!("contact_info holds more than one row; using the first");
        }
        decode_first(rows)
    }

    /// Overwrite the whole row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this ID, or any error
    /// from the update itself.
    pub async fn update(
        &self,
        id: ContactInfoId,
        update: &ContactInfoUpdate,
    ) -> Result<ContactInfo, StoreError> {
        let rows = self
            .store
            .update(
                self.caller,
                Table::ContactInfo,
                &[Filter::eq("id", id)],
                encode(update)?,
            )
            .await?;
        decode_first(rows)?.ok_or_else(|| StoreError::NotFound(format!("contact info {id}")))
    }

    /// Create the singleton row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected.
    pub async fn create(&self, update: &ContactInfoUpdate) -> Result<ContactInfo, StoreError> {
        let rows = self
            .store
            .insert(self.caller, Table::ContactInfo, vec![encode(update)?])
            .await?;
        decode_rows::<ContactInfo>(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no row".to_string()))
    }
}
