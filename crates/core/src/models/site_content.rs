//! Managed copy for the home and about pages.
//!
//! The `site_content` table holds one row per [`SectionKey`]. Rows with keys
//! this build does not know are kept on read and ignored by the editors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SectionId;

/// The fixed set of editable sections, in editor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Hero,
    AboutIntro,
    AboutMission,
    AboutVision,
    AboutValues,
}

impl SectionKey {
    /// Every section, in the order the editors render them.
    pub const ALL: [Self; 5] = [
        Self::Hero,
        Self::AboutIntro,
        Self::AboutMission,
        Self::AboutVision,
        Self::AboutValues,
    ];

    /// Key as stored in the `section` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::AboutIntro => "about_intro",
            Self::AboutMission => "about_mission",
            Self::AboutVision => "about_vision",
            Self::AboutValues => "about_values",
        }
    }

    /// Human-readable editor label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hero => "Hero Section",
            Self::AboutIntro => "Introduction",
            Self::AboutMission => "Our Mission",
            Self::AboutVision => "Our Vision",
            Self::AboutValues => "Our Values",
        }
    }

    /// Copy shown on public pages while the section has not been written.
    #[must_use]
    pub const fn default_copy(&self) -> (&'static str, &'static str) {
        match self {
            Self::Hero => (
                "Timeless Elegance",
                "Discover handcrafted furniture that transforms your space into a sanctuary of comfort and style",
            ),
            Self::AboutIntro => (
                "Who We Are",
                "FurnitureCo is a family-owned business dedicated to creating exceptional furniture that combines traditional craftsmanship with contemporary design.",
            ),
            Self::AboutMission => (
                "Our Craftsmanship",
                "Every piece of furniture we create is a labor of love. Our skilled artisans use time-honored techniques combined with modern innovation to ensure each item meets our exacting standards.",
            ),
            Self::AboutVision => (
                "Visit Our Showroom",
                "We invite you to visit our showroom to experience our furniture in person. Contact us to schedule an appointment or simply drop by during our business hours.",
            ),
            Self::AboutValues => (
                "Our Commitment",
                "Quality, sustainability and customer satisfaction guide everything we do, from sourcing to delivery.",
            ),
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}

/// A `site_content` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContentSection {
    pub id: SectionId,
    /// Raw key; may be a section this build does not manage.
    pub section: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SiteContentSection {
    #[must_use]
    pub fn key(&self) -> Option<SectionKey> {
        self.section.parse().ok()
    }
}

/// Title and body of one section, as rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionText {
    pub title: String,
    pub content: String,
}

/// Upsert payload for one section of the batch About save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEdit {
    pub section: SectionKey,
    pub title: String,
    pub content: String,
}

/// All sections, keyed for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContent {
    sections: HashMap<SectionKey, SectionText>,
}

impl SiteContent {
    /// Index rows by section key, skipping unknown keys.
    ///
    /// If the same key appears twice the later row wins, matching the
    /// `created_at` ordering the rows are fetched in.
    #[must_use]
    pub fn from_rows(rows: &[SiteContentSection]) -> Self {
        let sections = rows
            .iter()
            .filter_map(|row| {
                row.key().map(|key| {
                    (
                        key,
                        SectionText {
                            title: row.title.clone().unwrap_or_default(),
                            content: row.content.clone().unwrap_or_default(),
                        },
                    )
                })
            })
            .collect();
        Self { sections }
    }

    /// Stored text for a section, blank when the row is missing.
    #[must_use]
    pub fn get(&self, key: SectionKey) -> SectionText {
        self.sections.get(&key).cloned().unwrap_or_default()
    }

    /// Stored text with built-in copy substituted for blank fields.
    #[must_use]
    pub fn display(&self, key: SectionKey) -> SectionText {
        let stored = self.get(key);
        let (title, content) = key.default_copy();
        SectionText {
            title: if stored.title.trim().is_empty() {
                title.to_string()
            } else {
                stored.title
            },
            content: if stored.content.trim().is_empty() {
                content.to_string()
            } else {
                stored.content
            },
        }
    }

    /// Whether a row exists for the section.
    #[must_use]
    pub fn contains(&self, key: SectionKey) -> bool {
        self.sections.contains_key(&key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(section: &str, title: Option<&str>, content: Option<&str>) -> SiteContentSection {
        SiteContentSection {
            id: SectionId::new_v4(),
            section: section.to_string(),
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_section_key_parse() {
        assert_eq!("about_vision".parse::<SectionKey>().unwrap(), SectionKey::AboutVision);
        assert!("footer".parse::<SectionKey>().is_err());
        assert_eq!(
            serde_json::to_string(&SectionKey::AboutIntro).unwrap(),
            "\"about_intro\""
        );
    }

    #[test]
    fn test_labels_in_editor_order() {
        let labels: Vec<_> = SectionKey::ALL.iter().map(SectionKey::label).collect();
        assert_eq!(
            labels,
            ["Hero Section", "Introduction", "Our Mission", "Our Vision", "Our Values"]
        );
    }

    #[test]
    fn test_from_rows_skips_unknown_sections() {
        let content = SiteContent::from_rows(&[
            row("hero", Some("Welcome"), None),
            row("footer", Some("ignored"), Some("ignored")),
        ]);

        assert!(content.contains(SectionKey::Hero));
        assert!(!content.contains(SectionKey::AboutIntro));
        assert_eq!(content.get(SectionKey::Hero).title, "Welcome");
        assert_eq!(content.get(SectionKey::Hero).content, "");
    }

    #[test]
    fn test_display_falls_back_per_field() {
        let content = SiteContent::from_rows(&[row("hero", Some("Welcome"), Some("  "))]);
        let hero = content.display(SectionKey::Hero);

        assert_eq!(hero.title, "Welcome");
        assert_eq!(hero.content, SectionKey::Hero.default_copy().1);
        assert_eq!(
            content.display(SectionKey::AboutValues).title,
            "Our Commitment"
        );
    }
}
