use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use super::AppInfo;

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

/// Reports the configured application name.
#[get("/info")]
pub async fn info(app: web::Data<AppInfo>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "app_name": app.app_name
    }))
}
