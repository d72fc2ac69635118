//! Sign-in, the admin gate and sign-out.

use std::sync::Arc;

use axum::http::StatusCode;
use furnitureco_core::Role;
use furnitureco_integration_tests::{
    ADMIN_EMAIL, AdminClient, body_text, direct_session, location, seed_admin,
};
use furnitureco_store::memory::MemoryBackend;
use furnitureco_store::{AuthProvider, Caller, UserRoleRepository};

#[tokio::test]
async fn protected_pages_redirect_without_session() {
    let mut client = AdminClient::new(Arc::new(MemoryBackend::new()));

    for path in [
        "/admin/dashboard",
        "/admin/products",
        "/admin/products/new",
        "/admin/about",
        "/admin/contact",
    ] {
        let response = client.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/admin", "{path}");
    }
}

#[tokio::test]
async fn unknown_admin_path_is_404_not_login() {
    let mut client = AdminClient::new(Arc::new(MemoryBackend::new()));

    let response = client.get("/admin/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_signs_in_and_reaches_dashboard() {
    let backend = Arc::new(MemoryBackend::new());
    seed_admin(&backend, ADMIN_EMAIL).await;
    let mut client = AdminClient::new(backend);

    let response = client.login(ADMIN_EMAIL).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");

    let page = client.page("/admin/dashboard").await;
    assert!(page.contains("Dashboard"));
    assert!(page.contains(ADMIN_EMAIL));
    assert!(page.contains("Not set"));

    // A verified session skips the login screen
    let response = client.get("/admin").await;
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn non_admin_is_signed_out_and_denied() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .create_user("visitor@furnitureco.com", "hunter22")
        .await
        .unwrap();
    let mut client = AdminClient::new(backend);

    let response = client.login("visitor@furnitureco.com").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin?method=email");

    let page = client.page("/admin?method=email").await;
    assert!(page.contains("Access denied. Admin privileges required."));

    let response = client.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn failed_role_lookup_revokes_fresh_tokens() {
    let backend = Arc::new(MemoryBackend::new());
    seed_admin(&backend, ADMIN_EMAIL).await;
    let mut client = AdminClient::new(backend);
    client.backend.fail_next_read("statement timeout").await;

    let response = client.login(ADMIN_EMAIL).await;
    assert_eq!(location(&response), "/admin?method=email");
    assert_eq!(client.backend.live_sessions().await, 0);

    let page = client.page("/admin?method=email").await;
    assert!(page.contains("statement timeout"));

    let response = client.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn wrong_password_shows_service_message() {
    let backend = Arc::new(MemoryBackend::new());
    seed_admin(&backend, ADMIN_EMAIL).await;
    let mut client = AdminClient::new(backend);

    client
        .post(
            "/admin/login/email",
            "email=owner%40furnitureco.com&password=wrong-password",
        )
        .await;

    let page = client.page("/admin?method=email").await;
    assert!(page.contains("Invalid login credentials"));
}

#[tokio::test]
async fn sign_up_returns_to_sign_in() {
    let mut client = AdminClient::new(Arc::new(MemoryBackend::new()));

    let response = client
        .post(
            "/admin/login/email",
            "email=new%40furnitureco.com&password=hunter22&mode=sign_up",
        )
        .await;
    assert_eq!(location(&response), "/admin?method=email");

    let page = client.page("/admin?method=email").await;
    assert!(page.contains("Account created!"));
    assert!(page.contains("Sign in"));
}

#[tokio::test]
async fn short_sign_up_password_is_rejected() {
    let mut client = AdminClient::new(Arc::new(MemoryBackend::new()));

    let response = client
        .post(
            "/admin/login/email",
            "email=new%40furnitureco.com&password=12345&mode=sign_up",
        )
        .await;
    assert_eq!(location(&response), "/admin?method=email&mode=sign_up");

    let page = client.page("/admin?method=email&mode=sign_up").await;
    assert!(page.contains("Password must be at least 6 characters"));
}

#[tokio::test]
async fn phone_code_sign_in() {
    let backend = Arc::new(MemoryBackend::new());

    // Register the number and grant the role up front
    let phone = "+254712345678".parse().unwrap();
    backend.send_otp(&phone).await.unwrap();
    let code = backend.last_otp("+254712345678").await.unwrap();
    let session = backend.verify_otp(&phone, &code).await.unwrap();
    backend.grant_role(session.user.id, Role::Admin).await.unwrap();

    let mut client = AdminClient::new(backend.clone());

    let response = client
        .post("/admin/login/otp/send", "phone=%2B254+712+345+678")
        .await;
    assert_eq!(location(&response), "/admin?method=phone");

    let page = client.page("/admin?method=phone").await;
    assert!(page.contains("/admin/login/otp/verify"));
    assert!(page.contains("+254712345678"));

    let code = backend.last_otp("+254712345678").await.unwrap();
    let response = client
        .post("/admin/login/otp/verify", &format!("code={code}"))
        .await;
    assert_eq!(location(&response), "/admin/dashboard");

    let page = client.page("/admin/dashboard").await;
    assert!(page.contains("+254712345678"));
}

#[tokio::test]
async fn phone_reset_returns_to_number_step() {
    let mut client = AdminClient::new(Arc::new(MemoryBackend::new()));

    client
        .post("/admin/login/otp/send", "phone=%2B254712345678")
        .await;
    client.post("/admin/login/otp/reset", "").await;

    let page = client.page("/admin?method=phone").await;
    assert!(page.contains("/admin/login/otp/send"));
    assert!(!page.contains("/admin/login/otp/verify"));
}

#[tokio::test]
async fn verification_is_cached_until_logout() {
    let backend = Arc::new(MemoryBackend::new());
    let user_id = seed_admin(&backend, ADMIN_EMAIL).await;
    let mut client = AdminClient::new(backend.clone());

    client.login(ADMIN_EMAIL).await;
    client.page("/admin/dashboard").await;

    // Revoke the role behind the panel's back
    let other = direct_session(&backend, ADMIN_EMAIL).await;
    let removed = UserRoleRepository::new(backend.as_ref(), Caller::Bearer(&other.access_token))
        .revoke(user_id, Role::Admin)
        .await
        .unwrap();
    assert!(removed);

    // The cached verification still admits this session
    client.page("/admin/products").await;

    let response = client.post("/admin/logout", "").await;
    assert_eq!(location(&response), "/admin");
    let page = body_text(client.get("/admin").await).await;
    assert!(page.contains("Logged out"));

    let response = client.get("/admin/dashboard").await;
    assert_eq!(location(&response), "/admin");

    // Signing in again runs the check afresh
    let response = client.login(ADMIN_EMAIL).await;
    assert_eq!(location(&response), "/admin?method=email");
    let page = client.page("/admin?method=email").await;
    assert!(page.contains("Access denied"));
}

#[tokio::test]
async fn expired_token_is_refreshed() {
    let backend = Arc::new(MemoryBackend::new());
    seed_admin(&backend, ADMIN_EMAIL).await;
    // Every issued token is already inside the expiry buffer
    backend.set_token_ttl(0).await;
    let mut client = AdminClient::new(backend);

    client.login(ADMIN_EMAIL).await;

    client.page("/admin/dashboard").await;
    client.page("/admin/about").await;
}
