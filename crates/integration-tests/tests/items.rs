//! End-to-end item flows against a real database.
//!
//! These tests require `LOSTFOUND_TEST_DATABASE_URL` to point at a
//! disposable `PostgreSQL` database. Run with:
//!
//! ```bash
//! cargo test -p lostfound-integration-tests -- --include-ignored
//! ```

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::http::StatusCode;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lostfound_web::db::{PgUserStore, UserStore};
use lostfound_web::models::NewUser;
use lostfound_web::services::auth::hash_password;

use lostfound_integration_tests::{
    body_text, database_app, get, location, post_form, post_multipart, session_cookie,
};

/// A 1x1 PNG.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Log in and return the session cookie.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}&next=");
    let response = app
        .clone()
        .oneshot(post_form("/login", &body, None))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/"));
    session_cookie(&response).expect("login should set a session cookie")
}

/// Submit a lost item and return its id.
async fn add_lost_item(app: &Router, pool: &PgPool, cookie: &str, name: &str) -> i32 {
    let fields = [
        ("type", "lost"),
        ("name", name),
        ("description", "Black leather, student card inside"),
        ("location", "perpustakaan"),
        ("contact", "0812-3456-7890"),
    ];
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/add",
            &fields,
            Some(("wallet.png", TINY_PNG)),
            Some(cookie),
        ))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/list/lost"));

    sqlx::query_scalar::<_, i32>("SELECT id FROM lostfound.item WHERE name = $1")
        .bind(format!("Lost: {name}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_login_with_wrong_password_returns_to_login() {
    let (app, _pool, _state) = database_app().await;

    let response = app
        .oneshot(post_form(
            "/login",
            "username=admin&password=wrong-password&next=%2Fadd",
            None,
        ))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/login?next=%2Fadd"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_login_redirects_to_local_next() {
    let (app, _pool, _state) = database_app().await;

    let response = app
        .oneshot(post_form(
            "/login",
            "username=mahasiswa&password=student123&next=%2Fadd",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(location(&response), Some("/add"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_add_item_appears_in_listing_and_detail() {
    let (app, pool, state) = database_app().await;
    let cookie = login(&app, "mahasiswa", "student123").await;
    let name = format!("Wallet {}", Uuid::new_v4().simple());

    let id = add_lost_item(&app, &pool, &cookie, &name).await;

    let search = format!("/list/lost?search={}", name.replace(' ', "+"));
    let listing = app.clone().oneshot(get(&search, None)).await.unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    assert!(body_text(listing).await.contains(&format!("Lost: {name}")));

    let detail = app
        .clone()
        .oneshot(get(&format!("/item/{id}"), None))
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);
    let body = body_text(detail).await;
    assert!(body.contains("081234567890"));
    assert!(body.contains("Perpustakaan Pusat"));

    let image: Option<String> =
        sqlx::query_scalar("SELECT image FROM lostfound.item WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let image = image.expect("photo should be stored");
    assert!(image.ends_with(".png"));
    assert!(state.media().upload_dir().join(&image).exists());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_invalid_submission_rerenders_form() {
    let (app, _pool, _state) = database_app().await;
    let cookie = login(&app, "mahasiswa", "student123").await;

    let fields = [
        ("type", "lost"),
        ("name", ""),
        ("description", "Something"),
        ("location", "lainnya"),
        ("location_custom", ""),
        ("contact", "12"),
    ];
    let response = app
        .oneshot(post_multipart("/add", &fields, None, Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Item name is required."));
    assert!(body.contains("field-error"));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_student_cannot_delete() {
    let (app, pool, _state) = database_app().await;
    let cookie = login(&app, "mahasiswa", "student123").await;
    let id = add_lost_item(&app, &pool, &cookie, &format!("Umbrella {}", Uuid::new_v4().simple())).await;

    let request = axum::http::Request::post(format!("/delete/{id}"))
        .header(axum::http::header::COOKIE, &cookie)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_admin_deletes_item_and_photo() {
    let (app, pool, state) = database_app().await;
    let student = login(&app, "mahasiswa", "student123").await;
    let id = add_lost_item(&app, &pool, &student, &format!("Keys {}", Uuid::new_v4().simple())).await;

    let image: Option<String> =
        sqlx::query_scalar("SELECT image FROM lostfound.item WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    let photo = state.media().upload_dir().join(image.unwrap());

    let admin = login(&app, "admin", "admin123").await;
    let request = axum::http::Request::post(format!("/delete/{id}"))
        .header(axum::http::header::COOKIE, &admin)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/list/lost"));
    assert!(!photo.exists());

    let detail = app
        .oneshot(get(&format!("/item/{id}"), None))
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_other_student_cannot_edit() {
    let (app, pool, _state) = database_app().await;
    let owner = login(&app, "mahasiswa", "student123").await;
    let id = add_lost_item(&app, &pool, &owner, &format!("Laptop {}", Uuid::new_v4().simple())).await;

    // Admin may edit any item
    let admin = login(&app, "admin", "admin123").await;
    let response = app
        .clone()
        .oneshot(get(&format!("/edit/{id}"), Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Save Changes"));

    let username = format!("other{}", &Uuid::new_v4().simple().to_string()[..8]);
    let store = PgUserStore::new(&pool);
    store
        .insert(&NewUser {
            username: username.clone(),
            password_hash: hash_password("other-password").unwrap(),
            is_admin: false,
        })
        .await
        .unwrap();

    let other = login(&app, &username, "other-password").await;
    let response = app
        .oneshot(get(&format!("/edit/{id}"), Some(&other)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
