//! Site content repository.

use furnitureco_core::{SectionEdit, SiteContentSection};

use super::{decode_rows, encode};
use crate::backend::{Caller, TableStore};
use crate::error::StoreError;
use crate::query::{Direction, Select, Table};

/// Repository for the `site_content` table.
pub struct SiteContentRepository<'a> {
    store: &'a dyn TableStore,
    caller: Caller<'a>,
}

impl<'a> SiteContentRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn TableStore, caller: Caller<'a>) -> Self {
        Self { store, caller }
    }

    /// All rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list(&self) -> Result<Vec<SiteContentSection>, StoreError> {
        let query = Select::all().order_by("created_at", Direction::Asc);
        decode_rows(
            self.store
                .select(self.caller, Table::SiteContent, &query)
                .await?,
        )
    }

    /// Write every section in one statement, keyed on `section`.
    ///
    /// Either all sections are saved or none are. A section whose row is
    /// missing is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert is rejected; no section is changed.
    pub async fn save_sections(
        &self,
        edits: &[SectionEdit],
    ) -> Result<Vec<SiteContentSection>, StoreError> {
        let rows = edits.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        decode_rows(
            self.store
                .upsert(self.caller, Table::SiteContent, "section", rows)
                .await?,
        )
    }

    /// Insert sections that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected (including when a section
    /// already exists).
    pub async fn insert_sections(
        &self,
        edits: &[SectionEdit],
    ) -> Result<Vec<SiteContentSection>, StoreError> {
        let rows = edits.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        decode_rows(
            self.store
                .insert(self.caller, Table::SiteContent, rows)
                .await?,
        )
    }
}
