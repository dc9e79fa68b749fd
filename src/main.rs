use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use chrono::Duration;
use std::sync::Arc;

use todo_service::{
    auth::{PasswordHasher, TokenService},
    config::Config,
    routes::{AppContext, AppInfo, LoginTokenTtl},
    store::{MemoryStore, PgStore, Store},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io)?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await.map_err(to_io)?;
            store.ensure_schema().await.map_err(to_io)?;
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL is not set; todos are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let context = AppContext {
        store,
        tokens: TokenService::with_default_ttl(
            &config.jwt_secret,
            Duration::minutes(config.token_ttl_minutes),
        ),
        hasher: PasswordHasher::new(config.bcrypt_cost).map_err(to_io)?,
        login_ttl: LoginTokenTtl(Duration::minutes(config.login_token_ttl_minutes)),
        info: AppInfo {
            app_name: config.app_name.clone(),
        },
    };

    log::info!("Starting {} at {}", config.app_name, config.server_url());
    HttpServer::new(move || {
        let context = context.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(move |cfg| context.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

fn to_io(err: todo_service::AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
