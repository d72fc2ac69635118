//! Seed the managed content rows.
//!
//! Creates every About section that has no row yet, filled with the
//! built-in default copy, and an empty contact-info row if none exists.
//! Existing rows are never touched, so the command can be re-run safely.

use furnitureco_core::{ContactInfoUpdate, SectionEdit, SectionKey, SiteContent};
use furnitureco_store::{
    Caller, ContactInfoRepository, SiteContentRepository, StoreError, TableStore,
};
use tracing::info;

/// What a seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sections_created: usize,
    pub contact_created: bool,
}

/// Sections without a row, with their default copy.
fn missing_sections(existing: &SiteContent) -> Vec<SectionEdit> {
    SectionKey::ALL
        .into_iter()
        .filter(|key| !existing.contains(*key))
        .map(|key| {
            let (title, content) = key.default_copy();
            SectionEdit {
                section: key,
                title: title.to_string(),
                content: content.to_string(),
            }
        })
        .collect()
}

/// Seed missing rows.
///
/// # Errors
///
/// Returns an error if a read or insert is rejected.
pub async fn run(store: &dyn TableStore, caller: Caller<'_>) -> Result<SeedReport, StoreError> {
    let sections = SiteContentRepository::new(store, caller);
    let existing = SiteContent::from_rows(&sections.list().await?);

    let missing = missing_sections(&existing);
    if missing.is_empty() {
        info!("All site content sections already exist");
    } else {
        for edit in &missing {
            info!(section = %edit.section, "Creating section");
        }
        sections.insert_sections(&missing).await?;
    }

    let contact = ContactInfoRepository::new(store, caller);
    let contact_created = if contact.get().await?.is_some() {
        info!("Contact info already exists");
        false
    } else {
        let row = contact.create(&ContactInfoUpdate::default()).await?;
        info!(contact_info_id = %row.id, "Created contact info");
        true
    };

    Ok(SeedReport {
        sections_created: missing.len(),
        contact_created,
    })
}
