//! Product management: list, create, edit and delete.
//!
//! Colors and images are edited as one input per entry. Adding or removing
//! an entry re-submits the form with an `action` and re-renders it without
//! saving.

use askama::Template;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::Form;
use furnitureco_core::{Product, ProductDraft, ProductFormFields, ProductId};
use furnitureco_store::{ProductRepository, StoreError};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::{Chrome, render};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdmin};
use crate::models::Flash;
use crate::state::AppState;

const LIST_PATH: &str = "/admin/products";

/// Category choices offered in the editor.
pub const CATEGORIES: [(&str, &str); 6] = [
    ("sofa", "Sofa"),
    ("chair", "Chair"),
    ("table", "Table"),
    ("bed", "Bed"),
    ("storage", "Storage"),
    ("decor", "Decor"),
];

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(index))
        .route("/admin/products/new", get(new_form).post(create))
        .route("/admin/products/edit/{id}", get(edit_form).post(update))
        .route(
            "/admin/products/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

// =============================================================================
// Views
// =============================================================================

/// Product row for the list table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub model: String,
    pub category: String,
    pub featured: bool,
    pub image_url: Option<String>,
    pub color_count: usize,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            model: product.model.clone(),
            category: product.category.clone().unwrap_or_default(),
            featured: product.featured,
            image_url: product.primary_image().map(str::to_string),
            color_count: product.colors.len(),
        }
    }
}

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductRow>,
}

#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub chrome: Chrome,
    pub heading: &'static str,
    pub action_path: String,
    pub fields: ProductFormFields,
    pub error: Option<String>,
}

/// One `<option>` of the category select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl ProductFormTemplate {
    fn new(chrome: Chrome, editing: Option<ProductId>, fields: ProductFormFields) -> Self {
        let (heading, action_path) = editing.map_or_else(
            || ("New Product", "/admin/products/new".to_string()),
            |id| ("Edit Product", format!("/admin/products/edit/{id}")),
        );
        Self {
            chrome,
            heading,
            action_path,
            fields,
            error: None,
        }
    }

    /// Category choices with the current one selected.
    ///
    /// A stored category outside the fixed list is kept as an extra option
    /// so saving does not silently change it.
    #[must_use]
    pub fn category_options(&self) -> Vec<CategoryOption> {
        let current = self.fields.category.trim();
        let mut options: Vec<_> = CATEGORIES
            .iter()
            .map(|&(value, label)| CategoryOption {
                value: value.to_string(),
                label: label.to_string(),
                selected: current == value,
            })
            .collect();
        if !current.is_empty() && !options.iter().any(|o| o.selected) {
            options.push(CategoryOption {
                value: current.to_string(),
                label: current.to_string(),
                selected: true,
            });
        }
        options
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Template)]
#[template(path = "products/delete.html")]
pub struct DeleteTemplate {
    pub chrome: Chrome,
    pub product: ProductRow,
}

// =============================================================================
// Form
// =============================================================================

/// Submitted editor state. Repeated `colors`/`images` keys collect in order.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Checkbox: present only when ticked.
    #[serde(default)]
    pub featured: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub depth: String,
    #[serde(default)]
    pub action: Option<String>,
}

/// What the submit button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Save,
    AddColor,
    RemoveColor(usize),
    AddImage,
    RemoveImage(usize),
}

impl FormAction {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Save;
        };
        let index = |prefix: &str| raw.strip_prefix(prefix).and_then(|i| i.parse().ok());
        match raw {
            "add_color" => Self::AddColor,
            "add_image" => Self::AddImage,
            _ => index("remove_color:")
                .map(Self::RemoveColor)
                .or_else(|| index("remove_image:").map(Self::RemoveImage))
                .unwrap_or(Self::Save),
        }
    }
}

impl ProductForm {
    /// Split into the requested action and the editable fields.
    #[must_use]
    pub fn into_parts(self) -> (FormAction, ProductFormFields) {
        let action = FormAction::parse(self.action.as_deref());
        let fields = ProductFormFields {
            name: self.name,
            model: self.model,
            description: self.description,
            category: self.category,
            featured: self.featured.is_some(),
            colors: self.colors,
            images: self.images,
            width: self.width,
            height: self.height,
            depth: self.depth,
        };
        (action, fields)
    }
}

/// Apply an add/remove action. Lists never drop below one input.
fn apply_action(fields: &mut ProductFormFields, action: FormAction) {
    fn remove(list: &mut Vec<String>, index: usize) {
        if index < list.len() {
            list.remove(index);
        }
        if list.is_empty() {
            list.push(String::new());
        }
    }

    match action {
        FormAction::Save => {}
        FormAction::AddColor => fields.colors.push(String::new()),
        FormAction::AddImage => fields.images.push(String::new()),
        FormAction::RemoveColor(i) => remove(&mut fields.colors, i),
        FormAction::RemoveImage(i) => remove(&mut fields.images, i),
    }
}

/// Append a blank input after a filled last entry.
fn add_spare_slot(list: &mut Vec<String>) {
    if list.last().is_some_and(|last| !last.trim().is_empty()) {
        list.push(String::new());
    }
}

/// Notice for a failed save.
fn save_error_message(error: &StoreError, draft: &ProductDraft) -> String {
    if error.is_unique_violation() {
        format!(
            "A product with model \"{}\" already exists. Choose another model.",
            draft.model
        )
    } else {
        error.to_string()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /admin/products
#[instrument(skip_all)]
async fn index(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let mut chrome = Chrome::load(&ctx, &session, LIST_PATH).await;

    let products = match ProductRepository::new(state.store(), ctx.caller())
        .list_newest()
        .await
    {
        Ok(products) => products.iter().map(ProductRow::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            chrome = chrome.with_flash(Flash::error("Error", e.to_string()));
            Vec::new()
        }
    };

    render(&ProductsIndexTemplate { chrome, products })
}

/// GET /admin/products/new
#[instrument(skip_all)]
async fn new_form(
    RequireAdmin(ctx): RequireAdmin,
    session: Session,
) -> Result<Html<String>, AppError> {
    let chrome = Chrome::load(&ctx, &session, "/admin/products/new").await;
    render(&ProductFormTemplate::new(
        chrome,
        None,
        ProductFormFields::default(),
    ))
}

/// POST /admin/products/new
#[instrument(skip_all)]
async fn create(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    save(&state, &ctx, &session, None, form).await
}

/// GET /admin/products/edit/{id}
#[instrument(skip(ctx, state, session))]
async fn edit_form(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    let product = match ProductRepository::new(state.store(), ctx.caller())
        .find(id)
        .await
    {
        Ok(Some(product)) => product,
        Ok(None) => {
            Flash::error("Not found", "That product no longer exists.")
                .push(&session)
                .await;
            return Ok(Redirect::to(LIST_PATH).into_response());
        }
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to fetch product");
            Flash::error("Error", e.to_string()).push(&session).await;
            return Ok(Redirect::to(LIST_PATH).into_response());
        }
    };

    let chrome = Chrome::load(&ctx, &session, &format!("/admin/products/edit/{id}")).await;
    let mut fields = ProductFormFields::from_product(&product);
    add_spare_slot(&mut fields.colors);
    add_spare_slot(&mut fields.images);
    Ok(render(&ProductFormTemplate::new(chrome, Some(id), fields))?.into_response())
}

/// POST /admin/products/edit/{id}
#[instrument(skip(ctx, state, session, form))]
async fn update(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    save(&state, &ctx, &session, Some(id), form).await
}

/// Shared create/update path.
///
/// Validation and store failures re-render the form with what was typed.
async fn save(
    state: &AppState,
    ctx: &AdminContext,
    session: &Session,
    editing: Option<ProductId>,
    form: ProductForm,
) -> Result<Response, AppError> {
    let (action, mut fields) = form.into_parts();
    let current_path = editing.map_or_else(
        || "/admin/products/new".to_string(),
        |id| format!("/admin/products/edit/{id}"),
    );

    if action != FormAction::Save {
        apply_action(&mut fields, action);
        let chrome = Chrome::load(ctx, session, &current_path).await;
        return Ok(render(&ProductFormTemplate::new(chrome, editing, fields))?.into_response());
    }

    let draft = match fields.clone().into_draft() {
        Ok(draft) => draft,
        Err(e) => {
            let chrome = Chrome::load(ctx, session, &current_path).await;
            let page = ProductFormTemplate::new(chrome, editing, fields).with_error(e.to_string());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response());
        }
    };

    let repo = ProductRepository::new(state.store(), ctx.caller());
    let result = match editing {
        Some(id) => repo.update(id, &draft).await,
        None => repo.create(&draft).await,
    };

    match result {
        Ok(product) => {
            let verb = if editing.is_some() { "updated" } else { "created" };
            tracing::info!(product_id = %product.id, model = %product.model, "product {verb}");
            Flash::success("Saved", format!("Product {verb}."))
                .push(session)
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, model = %draft.model, "Failed to save product");
            let chrome = Chrome::load(ctx, session, &current_path).await;
            let page = ProductFormTemplate::new(chrome, editing, fields)
                .with_error(save_error_message(&e, &draft));
            let status = if e.is_unique_violation() {
                StatusCode::CONFLICT
            } else {
                StatusCode::BAD_GATEWAY
            };
            Ok((status, render(&page)?).into_response())
        }
    }
}

/// GET /admin/products/{id}/delete
#[instrument(skip(ctx, state, session))]
async fn confirm_delete(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    match ProductRepository::new(state.store(), ctx.caller())
        .find(id)
        .await
    {
        Ok(Some(product)) => {
            let chrome = Chrome::load(&ctx, &session, LIST_PATH).await;
            let page = DeleteTemplate {
                chrome,
                product: ProductRow::from(&product),
            };
            Ok(render(&page)?.into_response())
        }
        Ok(None) => {
            Flash::error("Not found", "That product no longer exists.")
                .push(&session)
                .await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to fetch product");
            Flash::error("Error", e.to_string()).push(&session).await;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
    }
}

/// POST /admin/products/{id}/delete
#[instrument(skip(ctx, state, session))]
async fn delete(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    let flash = match ProductRepository::new(state.store(), ctx.caller())
        .delete(id)
        .await
    {
        Ok(true) => {
            tracing::info!(product_id = %id, "product deleted");
            Flash::success("Deleted", "Product deleted.")
        }
        Ok(false) => Flash::error("Not found", "That product no longer exists."),
        Err(e) => {
            tracing::error!(error = %e, product_id = %id, "Failed to delete product");
            Flash::error("Error", e.to_string())
        }
    };
    flash.push(&session).await;
    Redirect::to(LIST_PATH)
}
