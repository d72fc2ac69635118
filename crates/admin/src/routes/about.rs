//! About Us editor.
//!
//! All five managed sections are edited on one page and saved together in
//! a single upsert, so a failed save changes nothing.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use furnitureco_core::{SectionEdit, SectionKey, SiteContent};
use furnitureco_store::SiteContentRepository;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{Chrome, render};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Flash;
use crate::state::AppState;

const ABOUT_PATH: &str = "/admin/about";

/// Build the about router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/about", get(edit).post(save))
}

/// One section's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionField {
    pub key: &'static str,
    pub label: &'static str,
    pub title: String,
    pub content: String,
}

impl SectionField {
    fn new(key: SectionKey, title: String, content: String) -> Self {
        Self {
            key: key.as_str(),
            label: key.label(),
            title,
            content,
        }
    }
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub chrome: Chrome,
    pub sections: Vec<SectionField>,
    pub error: Option<String>,
}

/// Read `{key}_title` / `{key}_content` for every managed section.
///
/// Missing inputs are saved as blank.
#[must_use]
pub fn edits_from_form(form: &HashMap<String, String>) -> Vec<SectionEdit> {
    SectionKey::ALL
        .into_iter()
        .map(|key| {
            let field = |suffix: &str| {
                form.get(&format!("{}_{suffix}", key.as_str()))
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default()
            };
            SectionEdit {
                section: key,
                title: field("title"),
                content: field("content"),
            }
        })
        .collect()
}

/// GET /admin/about
#[instrument(skip_all)]
async fn edit(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let mut chrome = Chrome::load(&ctx, &session, ABOUT_PATH).await;

    let content = match SiteContentRepository::new(state.store(), ctx.caller())
        .list()
        .await
    {
        Ok(rows) => SiteContent::from_rows(&rows),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch site content");
            chrome = chrome.with_flash(Flash::error("Error", e.to_string()));
            SiteContent::default()
        }
    };

    let sections = SectionKey::ALL
        .into_iter()
        .map(|key| {
            let text = content.get(key);
            SectionField::new(key, text.title, text.content)
        })
        .collect();

    render(&AboutTemplate {
        chrome,
        sections,
        error: None,
    })
}

/// POST /admin/about
#[instrument(skip_all)]
async fn save(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let edits = edits_from_form(&form);

    match SiteContentRepository::new(state.store(), ctx.caller())
        .save_sections(&edits)
        .await
    {
        Ok(saved) => {
            tracing::info!(sections = saved.len(), "about content saved");
            Flash::success("Saved", "About Us content saved.")
                .push(&session)
                .await;
            Ok(Redirect::to(ABOUT_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save about content");
            let sections = edits
                .into_iter()
                .map(|edit| SectionField::new(edit.section, edit.title, edit.content))
                .collect();
            let page = AboutTemplate {
                chrome: Chrome::load(&ctx, &session, ABOUT_PATH).await,
                sections,
                error: Some(e.to_string()),
            };
            Ok((StatusCode::BAD_GATEWAY, render(&page)?).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_from_form_covers_every_section() {
        let form = HashMap::from([
            ("hero_title".to_string(), " Crafted for Living ".to_string()),
            ("about_vision_content".to_string(), "Timeless".to_string()),
        ]);

        let edits = edits_from_form(&form);
        assert_eq!(edits.len(), SectionKey::ALL.len());

        let hero = edits
            .iter()
            .find(|e| e.section == SectionKey::Hero)
            .map(|e| e.title.as_str());
        assert_eq!(hero, Some("Crafted for Living"));

        let vision = edits
            .iter()
            .find(|e| e.section == SectionKey::AboutVision)
            .map(|e| (e.title.as_str(), e.content.as_str()));
        assert_eq!(vision, Some(("", "Timeless")));
    }
}
