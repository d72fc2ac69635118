//! About page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use furnitureco_core::{SectionKey, SectionText};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub hero: SectionText,
    /// Intro, mission, vision and values, in page order.
    pub sections: Vec<(SectionKey, SectionText)>,
}

/// Display the about page.
///
/// GET /about
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let content = state.catalog().site_content().await?;

    let sections = SectionKey::ALL
        .into_iter()
        .filter(|key| *key != SectionKey::Hero)
        .map(|key| (key, content.display(key)))
        .collect();

    Ok(AboutTemplate {
        hero: content.display(SectionKey::Hero),
        sections,
    })
}
