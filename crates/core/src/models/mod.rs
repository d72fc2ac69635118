//! Rows of the four remote tables.

pub mod contact_info;
pub mod product;
pub mod site_content;

use serde::{Deserialize, Deserializer};

pub use contact_info::{
    ContactFormError, ContactInfo, ContactInfoUpdate, SocialLinks, WorkingHours, parse_coordinate,
};
pub use product::{
    DEFAULT_CATEGORY, Dimensions, Product, ProductDraft, ProductFormError, ProductFormFields,
};
pub use site_content::{SectionEdit, SectionKey, SectionText, SiteContent, SiteContentSection};

/// Decode `null` as the type's default.
///
/// The store returns `null` for list and record columns that were never
/// written, which should read the same as an empty value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
