//! Contact page route handlers.
//!
//! The form is not stored anywhere: a valid submission is handed to
//! WhatsApp as a pre-filled message to the shop's number.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use furnitureco_core::messaging::{self, ContactMessage};
use furnitureco_core::{ContactInfo, SocialLinks, WorkingHours};
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Contact details for display.
pub struct ContactDetails {
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub working_hours: WorkingHours,
    pub social_links: SocialLinks,
    pub map_url: Option<String>,
}

impl From<ContactInfo> for ContactDetails {
    fn from(info: ContactInfo) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            address: info.full_address(),
            map_url: info.map_embed_url(),
            phone: non_blank(info.phone),
            whatsapp: non_blank(info.whatsapp),
            email: non_blank(info.email),
            working_hours: info.working_hours,
            social_links: info.social_links,
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub details: Option<ContactDetails>,
    pub chat_link: String,
    pub form: ContactMessage,
    pub error: Option<String>,
}

async fn render(
    state: &AppState,
    form: ContactMessage,
    error: Option<String>,
) -> Result<ContactTemplate, AppError> {
    let details = state.catalog().contact_info().await?.map(ContactDetails::from);
    let chat_link =
        messaging::plain_chat_link(details.as_ref().and_then(|d| d.whatsapp.as_deref()));

    Ok(ContactTemplate {
        details,
        chat_link,
        form,
        error,
    })
}

/// Display the contact page.
///
/// GET /contact
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    render(&state, ContactMessage::default(), None).await
}

/// Hand a contact-form submission over to WhatsApp.
///
/// POST /contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactMessage>,
) -> Result<Response, AppError> {
    let missing = form.missing_fields();
    if !missing.is_empty() {
        let error = format!("Please fill in: {}", missing.join(", "));
        let page = render(&state, form, Some(error)).await?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let whatsapp = state.catalog().whatsapp().await?;
    add_breadcrumb("contact", "Contact form hand-off", None);
    tracing::info!("contact form hand-off to WhatsApp");

    Ok(Redirect::to(&messaging::contact_form_link(whatsapp.as_deref(), &form)).into_response())
}
