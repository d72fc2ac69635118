//! Product management through the admin panel.

use std::sync::Arc;

use axum::http::StatusCode;
use furnitureco_integration_tests::{
    ADMIN_EMAIL, AdminClient, body_text, location, seed_admin, seed_product,
};
use furnitureco_store::Table;
use furnitureco_store::memory::MemoryBackend;
use serde_json::json;

async fn signed_in() -> AdminClient {
    let backend = Arc::new(MemoryBackend::new());
    seed_admin(&backend, ADMIN_EMAIL).await;
    let mut client = AdminClient::new(backend);
    client.login(ADMIN_EMAIL).await;
    client
}

#[tokio::test]
async fn empty_list_offers_first_product() {
    let mut client = signed_in().await;

    let page = client.page("/admin/products").await;
    assert!(page.contains("Add Your First Product"));
}

#[tokio::test]
async fn create_strips_blank_list_entries() {
    let mut client = signed_in().await;

    let response = client
        .post(
            "/admin/products/new",
            "name=Romeo&model=romeo&description=Classic+sofa&category=sofa\
             &colors=Beige&colors=&images=https%3A%2F%2Fx%2F1.jpg&images=+\
             &width=220cm&height=&depth=&action=save",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/products");

    let rows = client.backend.rows(Table::Products).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["colors"], json!(["Beige"]));
    assert_eq!(rows[0]["images"], json!(["https://x/1.jpg"]));
    assert_eq!(rows[0]["dimensions"], json!({"width": "220cm"}));
    assert_eq!(rows[0]["featured"], json!(false));

    let page = client.page("/admin/products").await;
    assert!(page.contains("Product created."));
    assert!(page.contains("Romeo"));
}

#[tokio::test]
async fn delete_removes_product_from_list() {
    let mut client = signed_in().await;
    let row = seed_product(
        &client.backend,
        json!({"name": "Juliet Armchair", "model": "juliet"}),
    )
    .await;
    let id = row["id"].as_str().unwrap().to_string();

    let page = client.page("/admin/products").await;
    assert!(page.contains("Juliet Armchair"));

    let confirm = client.page(&format!("/admin/products/{id}/delete")).await;
    assert!(confirm.contains("Delete product?"));

    let response = client
        .post(&format!("/admin/products/{id}/delete"), "")
        .await;
    assert_eq!(location(&response), "/admin/products");

    let page = client.page("/admin/products").await;
    assert!(page.contains("Product deleted."));
    assert!(!page.contains("Juliet Armchair"));
    assert!(client.backend.rows(Table::Products).await.is_empty());
}

#[tokio::test]
async fn edit_form_is_prefilled_with_spare_slots() {
    let mut client = signed_in().await;
    let row = seed_product(
        &client.backend,
        json!({
            "name": "Romeo",
            "model": "romeo",
            "description": "Classic sofa",
            "colors": ["Beige"],
            "images": null,
        }),
    )
    .await;
    let id = row["id"].as_str().unwrap();

    let page = client.page(&format!("/admin/products/edit/{id}")).await;
    assert!(page.contains("Edit Product"));
    assert!(page.contains(r#"name="colors" value="Beige""#));
    // One spare color slot after "Beige", one blank image slot
    assert_eq!(page.matches(r#"name="colors" value="""#).count(), 1);
    assert_eq!(page.matches(r#"name="images" value="""#).count(), 1);
}

#[tokio::test]
async fn update_overwrites_row() {
    let mut client = signed_in().await;
    let row = seed_product(
        &client.backend,
        json!({"name": "Romeo", "model": "romeo", "colors": ["Beige"]}),
    )
    .await;
    let id = row["id"].as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/admin/products/edit/{id}"),
            "name=Romeo+II&model=romeo&description=Updated&category=sofa\
             &featured=on&colors=Grey&action=save",
        )
        .await;
    assert_eq!(location(&response), "/admin/products");

    let rows = client.backend.rows(Table::Products).await;
    assert_eq!(rows[0]["name"], "Romeo II");
    assert_eq!(rows[0]["featured"], json!(true));
    assert_eq!(rows[0]["colors"], json!(["Grey"]));
}

#[tokio::test]
async fn add_color_rerenders_without_saving() {
    let mut client = signed_in().await;

    let response = client
        .post(
            "/admin/products/new",
            "name=Romeo&model=romeo&description=Sofa&colors=Beige&action=add_color",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains(r#"name="colors" value="Beige""#));
    assert!(page.contains(r#"name="colors" value="""#));
    assert!(client.backend.rows(Table::Products).await.is_empty());
}

#[tokio::test]
async fn duplicate_model_is_reported() {
    let mut client = signed_in().await;
    seed_product(&client.backend, json!({"name": "Romeo", "model": "romeo"})).await;

    let response = client
        .post(
            "/admin/products/new",
            "name=Another&model=romeo&description=Dup&action=save",
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let page = body_text(response).await;
    assert!(page.contains("already exists"));
    assert_eq!(client.backend.rows(Table::Products).await.len(), 1);
}

#[tokio::test]
async fn blank_name_is_rejected_server_side() {
    let mut client = signed_in().await;

    let response = client
        .post(
            "/admin/products/new",
            "name=+&model=romeo&description=Sofa&action=save",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Product name is required"));
    assert!(client.backend.rows(Table::Products).await.is_empty());
}

#[tokio::test]
async fn unknown_product_redirects_to_list() {
    let mut client = signed_in().await;

    let response = client
        .get("/admin/products/edit/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(location(&response), "/admin/products");

    let page = client.page("/admin/products").await;
    assert!(page.contains("That product no longer exists."));
}

#[tokio::test]
async fn model_with_spaces_saves_unchanged() {
    let mut client = signed_in().await;
    let row = seed_product(
        &client.backend,
        json!({"name": "Romeo", "model": "Romeo Sofa"}),
    )
    .await;
    let id = row["id"].as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/admin/products/edit/{id}"),
            "name=Romeo&model=Romeo+Sofa&description=Now+in+velvet&category=sofa&action=save",
        )
        .await;
    assert_eq!(location(&response), "/admin/products");

    let rows = client.backend.rows(Table::Products).await;
    assert_eq!(rows[0]["model"], "Romeo Sofa");
    assert_eq!(rows[0]["description"], "Now in velvet");
}
