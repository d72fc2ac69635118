//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use furnitureco_core::{Product, SectionKey, SectionText};
use tracing::instrument;

use super::products::ProductCard;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Number of products shown on the home page.
const HOME_PRODUCT_COUNT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: SectionText,
    pub intro: SectionText,
    pub products: Vec<ProductCard>,
}

/// Featured products, or the newest ones when nothing is featured.
///
/// Expects products in public order (featured first, then newest).
fn home_picks(products: &[Product]) -> Vec<ProductCard> {
    let featured: Vec<ProductCard> = products
        .iter()
        .filter(|p| p.featured)
        .take(HOME_PRODUCT_COUNT)
        .map(ProductCard::from)
        .collect();

    if featured.is_empty() {
        products
            .iter()
            .take(HOME_PRODUCT_COUNT)
            .map(ProductCard::from)
            .collect()
    } else {
        featured
    }
}

/// Display the home page.
///
/// GET /
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (content, products) = tokio::try_join!(
        state.catalog().site_content(),
        state.catalog().products()
    )?;

    Ok(HomeTemplate {
        hero: content.display(SectionKey::Hero),
        intro: content.display(SectionKey::AboutIntro),
        products: home_picks(&products),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(model: &str, featured: bool) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": furnitureco_core::Uuid::new_v4(),
            "name": model,
            "model": model,
            "featured": featured,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_home_picks_prefers_featured() {
        let products = [
            product("a", true),
            product("b", true),
            product("c", false),
        ];
        let models: Vec<_> = home_picks(&products).into_iter().map(|p| p.model).collect();
        assert_eq!(models, ["a", "b"]);
    }

    #[test]
    fn test_home_picks_falls_back_to_newest() {
        let products: Vec<_> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|m| product(m, false))
            .collect();
        let models: Vec<_> = home_picks(&products).into_iter().map(|p| p.model).collect();
        assert_eq!(models, ["a", "b", "c", "d"]);
    }
}
