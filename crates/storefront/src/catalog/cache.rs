//! Cache types for catalog reads.

use furnitureco_core::{ContactInfo, Product, SiteContent};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(String),
    SiteContent,
    ContactInfo,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    SiteContent(SiteContent),
    ContactInfo(Option<Box<ContactInfo>>),
}
