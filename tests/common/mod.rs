#![allow(dead_code)]

use actix_web::test;
use serde_json::json;
use std::sync::Arc;
use todo_service::auth::{PasswordHasher, TokenResponse, TokenService};
use todo_service::routes::{AppContext, AppInfo, LoginTokenTtl};
use todo_service::store::{MemoryStore, Store};

pub const TEST_SECRET: &str = "integration_test_secret";

/// App state over a fresh in-memory store, with the cheapest bcrypt cost.
pub fn test_context() -> (AppContext, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let context = AppContext {
        store: store.clone() as Arc<dyn Store>,
        tokens: TokenService::new(TEST_SECRET),
        hasher: PasswordHasher::new(4).expect("cost 4 is valid"),
        login_ttl: LoginTokenTtl::default(),
        info: AppInfo {
            app_name: "todo tests".to_string(),
        },
    };
    (context, store)
}

/// Builds an initialised test service from an `AppContext`.
macro_rules! init_app {
    ($context:expr) => {{
        let context = $context.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::Logger::default())
                .configure(move |cfg| context.configure(cfg)),
        )
        .await
    }};
}

pub async fn register_user<S, B>(app: &S, username: &str, password: &str)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/create/user")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "first_name": "Test",
            "last_name": "User",
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "registering {} failed",
        username
    );
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form(&[("username", username), ("password", password)])
        .to_request();
    let resp: TokenResponse = test::call_and_read_body_json(app, req).await;
    resp.token
}

pub async fn register_and_login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    register_user(app, username, password).await;
    login(app, username, password).await
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}

pub fn todo_payload(title: &str, priority: i32) -> serde_json::Value {
    json!({
        "title": title,
        "description": "from tests",
        "priority": priority,
        "complete": false
    })
}
