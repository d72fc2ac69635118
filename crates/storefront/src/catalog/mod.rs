//! Read-through cache over the public tables.
//!
//! Every public page reads through [`Catalog`]. Entries live for the
//! configured TTL (`CATALOG_CACHE_TTL_SECS`, 60 s by default), so an edit
//! made in the admin shows up on the site within one TTL. The admin never
//! reads through this cache.
//!
//! Missing products are not cached, so a product created in the admin is
//! visible on its detail page immediately.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use furnitureco_core::{ContactInfo, Product, SiteContent};
use furnitureco_store::{
    Caller, ContactInfoRepository, ProductRepository, SiteContentRepository, StoreError,
    TableStore,
};
use moka::future::Cache;
use tracing::{debug, instrument};

pub use cache::{CacheKey, CacheValue};

/// Cached, anonymous view of the catalog tables.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    store: Arc<dyn TableStore>,
    cache: Cache<CacheKey, CacheValue>,
}

impl Catalog {
    /// Create a catalog reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TableStore>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogInner { store, cache }),
        }
    }

    fn store(&self) -> &dyn TableStore {
        self.inner.store.as_ref()
    }

    /// All products in public order (featured first, then newest).
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = ProductRepository::new(self.store(), Caller::Anonymous)
            .list_catalog()
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// A product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self), fields(model = %model))]
    pub async fn product(&self, model: &str) -> Result<Option<Product>, StoreError> {
        let cache_key = CacheKey::Product(model.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let product = ProductRepository::new(self.store(), Caller::Anonymous)
            .find_by_model(model)
            .await?;

        if let Some(product) = &product {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
                .await;
        }

        Ok(product)
    }

    /// Managed page copy, keyed by section.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn site_content(&self) -> Result<SiteContent, StoreError> {
        if let Some(CacheValue::SiteContent(content)) =
            self.inner.cache.get(&CacheKey::SiteContent).await
        {
            debug!("Cache hit for site content");
            return Ok(content);
        }

        let rows = SiteContentRepository::new(self.store(), Caller::Anonymous)
            .list()
            .await?;
        let content = SiteContent::from_rows(&rows);

        self.inner
            .cache
            .insert(CacheKey::SiteContent, CacheValue::SiteContent(content.clone()))
            .await;

        Ok(content)
    }

    /// The contact-info singleton, if seeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    #[instrument(skip(self))]
    pub async fn contact_info(&self) -> Result<Option<ContactInfo>, StoreError> {
        if let Some(CacheValue::ContactInfo(info)) =
            self.inner.cache.get(&CacheKey::ContactInfo).await
        {
            debug!("Cache hit for contact info");
            return Ok(info.map(|info| *info));
        }

        let info = ContactInfoRepository::new(self.store(), Caller::Anonymous)
            .get()
            .await?;

        self.inner
            .cache
            .insert(
                CacheKey::ContactInfo,
                CacheValue::ContactInfo(info.clone().map(Box::new)),
            )
            .await;

        Ok(info)
    }

    /// The configured WhatsApp number, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn whatsapp(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contact_info().await?.and_then(|info| info.whatsapp))
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Count products straight from the store, bypassing the cache.
    ///
    /// Used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn ping(&self) -> Result<u64, StoreError> {
        ProductRepository::new(self.store(), Caller::Anonymous)
            .count()
            .await
    }
}
