//! Product repository.

use furnitureco_core::{Product, ProductDraft, ProductId};

use super::{decode_first, decode_rows, encode};
use crate::backend::{Caller, TableStore};
use crate::error::StoreError;
use crate::query::{Direction, Filter, Select, Table};

/// Repository for the `products` table.
pub struct ProductRepository<'a> {
    store: &'a dyn TableStore,
    caller: Caller<'a>,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn TableStore, caller: Caller<'a>) -> Self {
        Self { store, caller }
    }

    /// Public listing: featured first, then newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_catalog(&self) -> Result<Vec<Product>, StoreError> {
        let query = Select::all()
            .order_by("featured", Direction::Desc)
            .order_by("created_at", Direction::Desc);
        decode_rows(self.store.select(self.caller, Table::Products, &query).await?)
    }

    /// Admin listing: newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_newest(&self) -> Result<Vec<Product>, StoreError> {
        let query = Select::all().order_by("created_at", Direction::Desc);
        decode_rows(self.store.select(self.caller, Table::Products, &query).await?)
    }

    /// Look a product up by its public slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn find_by_model(&self, model: &str) -> Result<Option<Product>, StoreError> {
        let query = Select::all().eq("model", model).limit(1);
        decode_first(self.store.select(self.caller, Table::Products, &query).await?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let query = Select::all().eq("id", id).limit(1);
        decode_first(self.store.select(self.caller, Table::Products, &query).await?)
    }

    /// Exact number of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query fails.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.store.count(self.caller, Table::Products, &[]).await
    }

    /// # Errors
    ///
    /// Returns an error if the insert is rejected (for example a duplicate
    /// model) or the stored row cannot be decoded.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let rows = self
            .store
            .insert(self.caller, Table::Products, vec![encode(draft)?])
            .await?;
        decode_first(rows)?
            .ok_or_else(|| StoreError::InvalidResponse("insert returned no row".to_string()))
    }

    /// Overwrite every editable field of a product. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this ID, or any error
    /// from the update itself.
    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, StoreError> {
        let rows = self
            .store
            .update(
                self.caller,
                Table::Products,
                &[Filter::eq("id", id)],
                encode(draft)?,
            )
            .await?;
        decode_first(rows)?.ok_or_else(|| StoreError::NotFound(format!("product {id}")))
    }

    /// Delete a product. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected.
    pub async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let rows = self
            .store
            .delete(self.caller, Table::Products, &[Filter::eq("id", id)])
            .await?;
        Ok(!rows.is_empty())
    }
}
