//! Typed repositories over a [`TableStore`](crate::TableStore).
//!
//! Each repository borrows the store and the identity its calls run as, so a
//! handler builds one per request:
//!
//! ```rust,ignore
//! let products = ProductRepository::new(state.store(), Caller::Anonymous)
//!     .list_catalog()
//!     .await?;
//! ```

mod contact_info;
mod products;
mod site_content;
mod user_roles;

pub use contact_info::ContactInfoRepository;
pub use products::ProductRepository;
pub use site_content::SiteContentRepository;
pub use user_roles::UserRoleRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, StoreError> {
    rows.into_iter()
        .next()
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(StoreError::from)
}
