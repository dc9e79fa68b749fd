#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use common::{bearer, login, register_user, test_context, TEST_SECRET};
use serde_json::json;
use todo_service::auth::TokenService;
use todo_service::store::Store;

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let (context, store) = test_context();
    let app = init_app!(context);

    let req = test::TestRequest::post()
        .uri("/auth/create/user")
        .set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "first_name": "Alice",
            "last_name": "Liddell",
            "password": "pw1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_active"], true);
    assert!(body.get("hashed_password").is_none());
    assert!(body.get("password").is_none());

    let stored = store.find_user_by_username("alice").await.unwrap().unwrap();
    assert_ne!(stored.hashed_password, "pw1");
    assert!(stored.hashed_password.starts_with("$2b$"));

    let token = login(&app, "alice", "pw1").await;
    let identity = TokenService::new(TEST_SECRET).verify(&token).unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.user_id, stored.id);
}

#[actix_rt::test]
async fn test_login_token_lives_twenty_minutes() {
    let (context, _store) = test_context();
    let app = init_app!(context);
    register_user(&app, "alice", "pw1").await;

    let before = chrono::Utc::now().timestamp();
    let token = login(&app, "alice", "pw1").await;

    let claims = jsonwebtoken::decode::<todo_service::auth::Claims>(
        &token,
        &jsonwebtoken::DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .unwrap()
    .claims;
    let lifetime = claims.exp as i64 - before;
    assert!((20 * 60..=20 * 60 + 2).contains(&lifetime), "lifetime {}", lifetime);
}

#[actix_rt::test]
async fn test_duplicate_username_is_rejected() {
    let (context, _store) = test_context();
    let app = init_app!(context);
    register_user(&app, "alice", "pw1").await;

    let req = test::TestRequest::post()
        .uri("/auth/create/user")
        .set_json(json!({
            "username": "alice",
            "first_name": "Other",
            "last_name": "Alice",
            "password": "pw2"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The first registration still owns the name.
    let token = login(&app, "alice", "pw1").await;
    assert!(!token.is_empty());
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let (context, _store) = test_context();
    let app = init_app!(context);

    let test_cases = vec![
        (
            json!({ "first_name": "A", "last_name": "B", "password": "pw" }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
        (
            json!({ "username": "alice", "last_name": "B", "password": "pw" }),
            StatusCode::BAD_REQUEST,
            "missing first name",
        ),
        (
            json!({ "username": "alice", "first_name": "A", "last_name": "B" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        (
            json!({ "username": "alice", "email": "not-an-email", "first_name": "A", "last_name": "B", "password": "pw" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "username": "al", "first_name": "A", "last_name": "B", "password": "pw" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username too short",
        ),
        (
            json!({ "username": "user name!", "first_name": "A", "last_name": "B", "password": "pw" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "username with invalid chars",
        ),
        (
            json!({ "username": "alice", "first_name": "A", "last_name": "B", "password": "" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/create/user")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[actix_rt::test]
async fn test_bad_credentials_are_indistinguishable() {
    let (context, _store) = test_context();
    let app = init_app!(context);
    register_user(&app, "alice", "pw1").await;

    let mut bodies = Vec::new();
    for (username, password) in [("alice", "wrong"), ("nobody", "pw1")] {
        let req = test::TestRequest::post()
            .uri("/auth/token")
            .set_form(&[("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        bodies.push(test::read_body(resp).await);
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[actix_rt::test]
async fn test_login_requires_form_fields() {
    let (context, _store) = test_context();
    let app = init_app!(context);

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form(&[("username", "alice")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_rejected_tokens_share_one_response() {
    let (context, _store) = test_context();
    let app = init_app!(context);
    register_user(&app, "alice", "pw1").await;
    let valid = login(&app, "alice", "pw1").await;

    let tokens = TokenService::new(TEST_SECRET);
    let expired = tokens
        .issue("alice", 1, Some(chrono::Duration::seconds(-5)))
        .unwrap();
    let foreign = TokenService::new("someone-elses-secret")
        .issue("alice", 1, None)
        .unwrap();
    let signature_start = valid.rfind('.').unwrap() + 1;
    let mut tampered = valid.clone().into_bytes();
    tampered[signature_start] = if tampered[signature_start] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let mut bodies = Vec::new();
    for candidate in [None, Some(expired), Some(foreign), Some(tampered)] {
        let mut req = test::TestRequest::get().uri("/todos/user");
        if let Some(token) = &candidate {
            req = req.insert_header(bearer(token));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        bodies.push(test::read_body(resp).await);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
