#![doc = "The `todo_service` library crate."]
#![doc = ""]
#![doc = "Multi-user todo lists behind bearer-token authentication: password hashing,"]
#![doc = "token issuance and verification, ownership checks, the persistence trait with"]
#![doc = "its PostgreSQL and in-memory implementations, and the HTTP routes."]
#![doc = "The binary (`main.rs`) reads configuration and runs the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::routes::AppContext;
