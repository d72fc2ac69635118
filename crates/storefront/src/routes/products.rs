//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use furnitureco_core::{Product, messaging};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Product card data for listings.
#[derive(Clone)]
pub struct ProductCard {
    pub model: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub featured: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            model: product.model.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            image: product.primary_image().map(str::to_string),
            featured: product.featured,
        }
    }
}

/// Product detail data for the gallery page.
pub struct ProductDetail {
    pub model: String,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub featured: bool,
    pub colors: Vec<String>,
    pub images: Vec<String>,
    pub selected: usize,
    pub dimensions: Vec<(&'static str, String)>,
}

impl ProductDetail {
    fn new(product: Product, requested: Option<usize>) -> Self {
        let selected = product.gallery_index(requested);
        let dimensions = [
            ("Width", &product.dimensions.width),
            ("Height", &product.dimensions.height),
            ("Depth", &product.dimensions.depth),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (label, v.to_string()))
        })
        .collect();

        Self {
            selected,
            dimensions,
            model: product.model,
            name: product.name,
            description: product.description.unwrap_or_default(),
            category: product.category.filter(|c| !c.trim().is_empty()),
            featured: product.featured,
            colors: product.colors,
            images: product.images,
        }
    }

    /// The image shown in the main gallery slot.
    #[must_use]
    pub fn selected_image(&self) -> Option<&str> {
        self.images.get(self.selected).map(String::as_str)
    }
}

/// Gallery selection query parameters.
///
/// Kept as text so a malformed `?image=` still renders the page.
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub image: Option<String>,
}

impl GalleryQuery {
    /// The requested image index, if it parses.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.image.as_deref().and_then(|i| i.trim().parse().ok())
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCard>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetail,
}

/// Shown when no product has the requested slug.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub model: String,
}

/// Display product listing page.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.catalog().products().await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductCard::from).collect(),
    })
}

/// Display product detail page.
///
/// GET /products/{model}?image=N
#[instrument(skip(state, query), fields(model = %model))]
pub async fn show(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(query): Query<GalleryQuery>,
) -> Result<Response, AppError> {
    let Some(product) = state.catalog().product(&model).await? else {
        return Ok(not_found(model));
    };

    Ok(ProductShowTemplate {
        product: ProductDetail::new(product, query.index()),
    }
    .into_response())
}

/// Hand the customer over to WhatsApp with an order message.
///
/// GET /products/{model}/order
#[instrument(skip(state), fields(model = %model))]
pub async fn order(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Response, AppError> {
    let Some(product) = state.catalog().product(&model).await? else {
        return Ok(not_found(model));
    };
    let whatsapp = state.catalog().whatsapp().await?;

    add_breadcrumb("order", "Order hand-off", Some(&[("model", product.model.as_str())]));
    tracing::info!(model = %product.model, "order hand-off to WhatsApp");

    Ok(Redirect::to(&messaging::product_order_link(whatsapp.as_deref(), &product)).into_response())
}

fn not_found(model: String) -> Response {
    (StatusCode::NOT_FOUND, ProductNotFoundTemplate { model }).into_response()
}
