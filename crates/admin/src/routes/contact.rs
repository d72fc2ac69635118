//! Contact information editor.
//!
//! Edits the single `contact_info` row. The row itself is created by
//! `fco-cli seed`; this screen only updates it.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use furnitureco_core::{
    ContactFormError, ContactInfoUpdate, SocialLinks, WorkingHours, parse_coordinate,
};
use furnitureco_store::ContactInfoRepository;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{Chrome, render};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdmin};
use crate::models::Flash;
use crate::state::AppState;

const CONTACT_PATH: &str = "/admin/contact";

const NOT_SEEDED: &str =
    "No contact record exists yet. Run `fco-cli seed` to create it, then reload this page.";

/// Build the contact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/contact", get(edit).post(save))
}

/// Flat form state. Coordinates stay text until saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub map_lat: String,
    pub map_lng: String,
    pub weekdays: String,
    pub saturday: String,
    pub sunday: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
}

impl From<ContactInfoUpdate> for ContactForm {
    fn from(info: ContactInfoUpdate) -> Self {
        let text = |v: Option<String>| v.unwrap_or_default();
        let coordinate = |v: Option<f64>| v.map(|c| c.to_string()).unwrap_or_default();
        Self {
            phone: text(info.phone),
            whatsapp: text(info.whatsapp),
            email: text(info.email),
            address: text(info.address),
            city: text(info.city),
            country: text(info.country),
            map_lat: coordinate(info.map_lat),
            map_lng: coordinate(info.map_lng),
            weekdays: info.working_hours.weekdays,
            saturday: info.working_hours.saturday,
            sunday: info.working_hours.sunday,
            facebook: info.social_links.facebook,
            instagram: info.social_links.instagram,
            twitter: info.social_links.twitter,
        }
    }
}

impl ContactForm {
    /// Build the whole-row update. Blank scalars are stored as `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is present but not a valid latitude
    /// or longitude.
    pub fn to_update(&self) -> Result<ContactInfoUpdate, ContactFormError> {
        let text = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        Ok(ContactInfoUpdate {
            phone: text(&self.phone),
            whatsapp: text(&self.whatsapp),
            email: text(&self.email),
            address: text(&self.address),
            city: text(&self.city),
            country: text(&self.country),
            map_lat: parse_coordinate("Latitude", &self.map_lat, 90.0)?,
            map_lng: parse_coordinate("Longitude", &self.map_lng, 180.0)?,
            working_hours: WorkingHours {
                weekdays: self.weekdays.trim().to_string(),
                saturday: self.saturday.trim().to_string(),
                sunday: self.sunday.trim().to_string(),
            },
            social_links: SocialLinks {
                facebook: self.facebook.trim().to_string(),
                instagram: self.instagram.trim().to_string(),
                twitter: self.twitter.trim().to_string(),
            },
        })
    }
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub chrome: Chrome,
    pub form: ContactForm,
    /// False when the singleton row is missing; the form is then read-only.
    pub seeded: bool,
    pub error: Option<String>,
}

/// GET /admin/contact
#[instrument(skip_all)]
async fn edit(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let chrome = Chrome::load(&ctx, &session, CONTACT_PATH).await;

    let page = match ContactInfoRepository::new(state.store(), ctx.caller())
        .get()
        .await
    {
        Ok(Some(info)) => ContactTemplate {
            chrome,
            form: info.to_update().into(),
            seeded: true,
            error: None,
        },
        Ok(None) => ContactTemplate {
            chrome: chrome.with_flash(Flash::error("Not set up", NOT_SEEDED)),
            form: ContactForm::default(),
            seeded: false,
            error: None,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch contact info");
            ContactTemplate {
                chrome: chrome.with_flash(Flash::error("Error", e.to_string())),
                form: ContactForm::default(),
                seeded: false,
                error: None,
            }
        }
    };

    render(&page)
}

/// POST /admin/contact
#[instrument(skip_all)]
async fn save(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    let update = match form.to_update() {
        Ok(update) => update,
        Err(e) => {
            return rerender(&ctx, &session, form, StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
                .await;
        }
    };

    let repo = ContactInfoRepository::new(state.store(), ctx.caller());
    let result = match repo.get().await {
        Ok(Some(current)) => repo.update(current.id, &update).await,
        Ok(None) => {
            return rerender(&ctx, &session, form, StatusCode::CONFLICT, NOT_SEEDED.to_string())
                .await;
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(saved) => {
            tracing::info!(contact_info_id = %saved.id, "contact info saved");
            Flash::success("Saved", "Contact information saved.")
                .push(&session)
                .await;
            Ok(Redirect::to(CONTACT_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save contact info");
            rerender(&ctx, &session, form, StatusCode::BAD_GATEWAY, e.to_string()).await
        }
    }
}

async fn rerender(
    ctx: &AdminContext,
    session: &Session,
    form: ContactForm,
    status: StatusCode,
    error: String,
) -> Result<Response, AppError> {
    let page = ContactTemplate {
        chrome: Chrome::load(ctx, session, CONTACT_PATH).await,
        form,
        seeded: true,
        error: Some(error),
    };
    Ok((status, render(&page)?).into_response())
}
