pub mod auth;
pub mod health;
pub mod todos;

pub use self::auth::LoginTokenTtl;

use actix_web::{error, web};
use std::sync::Arc;

use crate::{
    auth::{PasswordHasher, TokenService},
    error::AppError,
    store::Store,
};

/// Application name served by `GET /info`.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub app_name: String,
}

/// Everything a worker needs to serve requests. Cloned once per worker.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
    pub login_ttl: LoginTokenTtl,
    pub info: AppInfo,
}

impl AppContext {
    /// Registers shared state, body extractor settings and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.store.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(web::Data::new(self.hasher.clone()))
            .app_data(web::Data::new(self.login_ttl))
            .app_data(web::Data::new(self.info.clone()))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                error::Error::from(AppError::BadRequest(err.to_string()))
            }))
            .app_data(web::FormConfig::default().error_handler(|err, _req| {
                error::Error::from(AppError::BadRequest(err.to_string()))
            }))
            .configure(config);
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::info)
        .service(
            web::scope("/auth")
                .service(auth::create_user)
                .service(auth::login_for_access_token),
        )
        .service(
            // `/user` must be registered ahead of `/{todo_id}`.
            web::scope("/todos")
                .service(todos::read_all)
                .service(todos::read_all_by_user)
                .service(todos::read_todo)
                .service(todos::create_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}
