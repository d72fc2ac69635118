//! Catalog products and the admin form state that edits them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::types::ProductId;

/// Category assigned to new products until the admin picks another.
pub const DEFAULT_CATEGORY: &str = "sofa";

/// Free-text physical dimensions. Each axis is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
}

impl Dimensions {
    /// Build from raw form inputs, dropping blank axes.
    #[must_use]
    pub fn from_inputs(width: &str, height: &str, depth: &str) -> Self {
        Self {
            width: non_blank(width),
            height: non_blank(height),
            depth: non_blank(depth),
        }
    }

    /// True when no axis carries a non-blank value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.width, &self.height, &self.depth]
            .iter()
            .all(|axis| axis.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Public slug, used in `/products/{model}`.
    pub model: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Dimensions,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// First image URL, used for cards and thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Clamp a gallery selection to the available images.
    ///
    /// Out-of-range (or absent) selections fall back to the first image.
    #[must_use]
    pub fn gallery_index(&self, requested: Option<usize>) -> usize {
        requested.filter(|&i| i < self.images.len()).unwrap_or(0)
    }
}

/// Insert/update payload for the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub model: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub featured: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub dimensions: Dimensions,
}

/// Errors when turning form state into a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductFormError {
    #[error("Product name is required")]
    MissingName,
    #[error("Model is required")]
    MissingModel,
}

/// Flat, string-only form state for the product editor.
///
/// Lists are edited as one input per entry, and the three dimension axes
/// as scalar inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFormFields {
    pub name: String,
    pub model: String,
    pub description: String,
    pub category: String,
    pub featured: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub width: String,
    pub height: String,
    pub depth: String,
}

impl Default for ProductFormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            featured: false,
            colors: vec![String::new()],
            images: vec![String::new()],
            width: String::new(),
            height: String::new(),
            depth: String::new(),
        }
    }
}

impl ProductFormFields {
    /// Flatten a stored product into editable form state.
    ///
    /// An empty list still gets one blank input so the editor always has a
    /// slot to type into.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            model: product.model.clone(),
            description: product.description.clone().unwrap_or_default(),
            category: product
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            featured: product.featured,
            colors: at_least_one(&product.colors),
            images: at_least_one(&product.images),
            width: product.dimensions.width.clone().unwrap_or_default(),
            height: product.dimensions.height.clone().unwrap_or_default(),
            depth: product.dimensions.depth.clone().unwrap_or_default(),
        }
    }

    /// Re-assemble the form into a persistable draft.
    ///
    /// Every list entry is trimmed and blank entries are dropped; blank
    /// dimension axes are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error when name or model is blank.
    pub fn into_draft(self) -> Result<ProductDraft, ProductFormError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductFormError::MissingName);
        }

        let model = self.model.trim().to_string();
        if model.is_empty() {
            return Err(ProductFormError::MissingModel);
        }

        Ok(ProductDraft {
            name,
            model,
            description: non_blank(&self.description),
            category: non_blank(&self.category),
            featured: self.featured,
            colors: compact(self.colors),
            images: compact(self.images),
            dimensions: Dimensions::from_inputs(&self.width, &self.height, &self.depth),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn compact(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| non_blank(&v))
        .collect()
}

fn at_least_one(values: &[String]) -> Vec<String> {
    if values.is_empty() {
        vec![String::new()]
    } else {
        values.to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "6f1c1a52-3b9e-4a53-9c1d-3a2f0b9f5e10",
            "name": "Romeo",
            "model": "romeo",
            "description": "Classic sofa",
            "category": "sofa",
            "featured": true,
            "colors": ["Beige", "Brown"],
            "images": ["https://x/1.jpg", "https://x/2.jpg"],
            "dimensions": {"width": "220cm", "height": "90cm"},
            "created_at": "2024-05-01T10:00:00.123456+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_null_columns_as_empty() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "6f1c1a52-3b9e-4a53-9c1d-3a2f0b9f5e10",
            "name": "Nevada",
            "model": "nevada",
            "description": null,
            "category": null,
            "featured": null,
            "colors": null,
            "images": null,
            "dimensions": null,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert!(!product.featured);
        assert!(product.colors.is_empty());
        assert!(product.images.is_empty());
        assert!(product.dimensions.is_empty());
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_gallery_index_falls_back_to_first() {
        let product = sample_product();
        assert_eq!(product.gallery_index(None), 0);
        assert_eq!(product.gallery_index(Some(1)), 1);
        assert_eq!(product.gallery_index(Some(2)), 0);
    }

    #[test]
    fn test_default_form_has_sofa_and_blank_slots() {
        let form = ProductFormFields::default();
        assert_eq!(form.category, "sofa");
        assert_eq!(form.colors, vec![String::new()]);
        assert_eq!(form.images, vec![String::new()]);
    }

    #[test]
    fn test_from_product_flattens_lists_and_dimensions() {
        let mut product = sample_product();
        product.colors.clear();
        let form = ProductFormFields::from_product(&product);

        assert_eq!(form.colors, vec![String::new()]);
        assert_eq!(form.images.len(), 2);
        assert_eq!(form.width, "220cm");
        assert_eq!(form.depth, "");
    }

    #[test]
    fn test_into_draft_strips_blank_entries() {
        let form = ProductFormFields {
            name: "Romeo".to_string(),
            model: "romeo".to_string(),
            description: "Classic sofa".to_string(),
            colors: vec!["Beige".to_string(), String::new()],
            images: vec!["https://x/1.jpg".to_string()],
            ..ProductFormFields::default()
        };

        let draft = form.into_draft().unwrap();
        assert_eq!(draft.colors, vec!["Beige".to_string()]);
        assert_eq!(draft.images, vec!["https://x/1.jpg".to_string()]);
        assert_eq!(draft.category.as_deref(), Some("sofa"));
        assert!(draft.dimensions.is_empty());
    }

    #[test]
    fn test_into_draft_trims_whitespace_entries() {
        let form = ProductFormFields {
            name: " Rixsos ".to_string(),
            model: "rixsos".to_string(),
            colors: vec!["  ".to_string(), " Grey ".to_string()],
            images: vec!["\t".to_string()],
            width: " 180cm ".to_string(),
            ..ProductFormFields::default()
        };

        let draft = form.into_draft().unwrap();
        assert_eq!(draft.name, "Rixsos");
        assert_eq!(draft.colors, vec!["Grey".to_string()]);
        assert!(draft.images.is_empty());
        assert_eq!(draft.dimensions.width.as_deref(), Some("180cm"));
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_into_draft_requires_name_and_model() {
        let form = ProductFormFields {
            model: "romeo".to_string(),
            ..ProductFormFields::default()
        };
        assert_eq!(form.into_draft(), Err(ProductFormError::MissingName));

        let form = ProductFormFields {
            name: "Romeo".to_string(),
            ..ProductFormFields::default()
        };
        assert_eq!(form.into_draft(), Err(ProductFormError::MissingModel));
    }

    #[test]
    fn test_into_draft_keeps_model_as_typed() {
        let draft = ProductFormFields {
            name: "Romeo".to_string(),
            model: "  Romeo Sofa/2 ".to_string(),
            ..ProductFormFields::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.model, "Romeo Sofa/2");
    }

    #[test]
    fn test_draft_omits_blank_dimensions_on_the_wire() {
        let draft = ProductFormFields {
            name: "Romeo".to_string(),
            model: "romeo".to_string(),
            height: "90cm".to_string(),
            ..ProductFormFields::default()
        }
        .into_draft()
        .unwrap();

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["dimensions"], serde_json::json!({"height": "90cm"}));
    }
}
