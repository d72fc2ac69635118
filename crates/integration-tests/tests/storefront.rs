//! Public catalog pages.

use std::sync::Arc;

use axum::http::StatusCode;
use furnitureco_integration_tests::{
    body_text, get, location, post_form, seed_product, send, storefront,
};
use furnitureco_store::Table;
use furnitureco_store::memory::MemoryBackend;
use serde_json::json;

async fn seeded() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    seed_product(
        &backend,
        json!({
            "name": "Romeo",
            "model": "romeo",
            "description": "Classic sofa",
            "images": ["https://x/1.jpg", "https://x/2.jpg"],
            "colors": ["Beige"],
            "featured": false,
            "created_at": "2024-01-01T00:00:00+00:00",
        }),
    )
    .await;
    seed_product(
        &backend,
        json!({
            "name": "Juliet",
            "model": "juliet",
            "featured": true,
            "created_at": "2023-01-01T00:00:00+00:00",
        }),
    )
    .await;
    seed_product(
        &backend,
        json!({
            "name": "Verona",
            "model": "verona",
            "featured": false,
            "created_at": "2024-06-01T00:00:00+00:00",
        }),
    )
    .await;
    backend
        .seed(Table::ContactInfo, json!({"whatsapp": "+254 700 000 000"}))
        .await
        .unwrap();
    backend
}

#[tokio::test]
async fn health() {
    let app = storefront(&Arc::new(MemoryBackend::new()));

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, get("/health/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_is_featured_first_then_newest() {
    let app = storefront(&seeded().await);

    let page = body_text(send(&app, get("/products")).await).await;
    let juliet = page.find("Juliet").unwrap();
    let verona = page.find("Verona").unwrap();
    let romeo = page.find("Romeo").unwrap();
    assert!(juliet < verona && verona < romeo);
}

#[tokio::test]
async fn empty_listing_message() {
    let app = storefront(&Arc::new(MemoryBackend::new()));

    let page = body_text(send(&app, get("/products")).await).await;
    assert!(page.contains("No products available yet. Check back soon!"));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let app = storefront(&seeded().await);

    let response = send(&app, get("/products/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = body_text(response).await;
    assert!(page.contains("Product not found"));
    assert!(page.contains(r#"href="/products""#));
}

#[tokio::test]
async fn gallery_index_falls_back_to_first_image() {
    let app = storefront(&seeded().await);

    let page = body_text(send(&app, get("/products/romeo?image=9")).await).await;
    assert!(page.contains(r#"class="gallery-main" src="https://x/1.jpg""#));

    for malformed in ["-1", "", "abc"] {
        let response = send(&app, get(&format!("/products/romeo?image={malformed}"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains(r#"class="gallery-main" src="https://x/1.jpg""#));
    }

    let page = body_text(send(&app, get("/products/romeo?image=1")).await).await;
    assert!(page.contains(r#"class="gallery-main" src="https://x/2.jpg""#));
}

#[tokio::test]
async fn order_hands_off_to_whatsapp() {
    let app = storefront(&seeded().await);

    let response = send(&app, get("/products/romeo/order")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("https://wa.me/254700000000?text="));
    assert!(target.contains("Romeo"));
    assert!(target.contains("Model%3A%20romeo"));
}

#[tokio::test]
async fn contact_form_requires_fields() {
    let app = storefront(&seeded().await);

    let response = send(&app, post_form("/contact", "name=Ann&email=&message=")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("Please fill in"));
    assert!(page.contains(r#"value="Ann""#));
}

#[tokio::test]
async fn contact_form_hands_off_to_whatsapp() {
    let app = storefront(&seeded().await);

    let response = send(
        &app,
        post_form(
            "/contact",
            "name=Ann&email=ann%40example.com&phone=&message=Do+you+deliver%3F",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("https://wa.me/254700000000?text="));
    assert!(target.contains("New%20Contact%20Form%20Submission"));
}

#[tokio::test]
async fn catch_all_is_not_found() {
    let app = storefront(&Arc::new(MemoryBackend::new()));

    let response = send(&app, get("/no/such/page")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn model_with_spaces_is_linked_and_served() {
    let backend = Arc::new(MemoryBackend::new());
    seed_product(
        &backend,
        json!({"name": "Romeo", "model": "Romeo Sofa", "featured": false}),
    )
    .await;
    let app = storefront(&backend);

    let page = body_text(send(&app, get("/products")).await).await;
    assert!(page.contains(r#"href="/products/Romeo%20Sofa""#));

    let response = send(&app, get("/products/Romeo%20Sofa")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Model: Romeo Sofa"));
}
