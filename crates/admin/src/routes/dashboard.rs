//! Dashboard route handler.

use askama::Template;
use axum::{Router, extract::State, response::Html, routing::get};
use furnitureco_core::SectionKey;
use furnitureco_store::{ContactInfoRepository, ProductRepository};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{Chrome, render};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(index))
}

/// Summary cards.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    /// `None` when the count could not be fetched.
    pub products: Option<u64>,
    pub sections: usize,
    pub contact_configured: bool,
}

impl DashboardStats {
    #[must_use]
    pub fn products_label(&self) -> String {
        self.products
            .map_or_else(|| "-".to_string(), |count| count.to_string())
    }

    #[must_use]
    pub const fn contact_label(&self) -> &'static str {
        if self.contact_configured {
            "Configured"
        } else {
            "Not set"
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub chrome: Chrome,
    pub stats: DashboardStats,
}

/// GET /admin/dashboard
#[instrument(skip_all)]
async fn index(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let products = match ProductRepository::new(state.store(), ctx.caller())
        .count()
        .await
    {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::error!(error = %e, "Failed to count products");
            None
        }
    };

    let contact_configured = match ContactInfoRepository::new(state.store(), ctx.caller())
        .get()
        .await
    {
        Ok(info) => info.is_some(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch contact info");
            false
        }
    };

    let template = DashboardTemplate {
        chrome: Chrome::load(&ctx, &session, "/admin/dashboard").await,
        stats: DashboardStats {
            products,
            sections: SectionKey::ALL.len(),
            contact_configured,
        },
    };
    render(&template)
}
