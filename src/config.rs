use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::auth::{DEFAULT_TOKEN_TTL_MINUTES, LOGIN_TOKEN_TTL_MINUTES};
use crate::error::AppError;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub app_name: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub token_ttl_minutes: i64,
    pub login_token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("SECRET_KEY"))
            .map_err(|_| AppError::InternalServerError("JWT_SECRET must be set".into()))?;
        if jwt_secret.is_empty() {
            return Err(AppError::InternalServerError(
                "JWT_SECRET must not be empty".into(),
            ));
        }

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::InternalServerError(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        Ok(Self {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "todos fast Api".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port: parse_var("SERVER_PORT", 8080)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            bcrypt_cost,
            token_ttl_minutes: parse_ttl_minutes("TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?,
            login_token_ttl_minutes: parse_ttl_minutes(
                "LOGIN_TOKEN_TTL_MINUTES",
                LOGIN_TOKEN_TTL_MINUTES,
            )?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", name))),
        Err(_) => Ok(default),
    }
}

/// Token lifetimes must be positive and small enough for `Duration::minutes`.
fn parse_ttl_minutes(name: &str, default: i64) -> Result<i64, AppError> {
    let minutes = parse_var(name, default)?;
    if minutes <= 0 || Duration::try_minutes(minutes).is_none() {
        return Err(AppError::InternalServerError(format!(
            "{} must be a positive number of minutes",
            name
        )));
    }
    Ok(minutes)
}
