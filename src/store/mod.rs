//! Persistence for users and todos.
//!
//! Handlers only see the [`Store`] trait. [`PgStore`] backs it with PostgreSQL through
//! sqlx; [`MemoryStore`] keeps everything in process and is used when no database is
//! configured and throughout the tests.
//!
//! Every single-todo operation takes the caller's id as `owner_id` and matches on
//! both columns, so a todo owned by someone else behaves exactly like a missing one.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new, active user. A taken username yields `AppError::BadRequest`.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Every todo regardless of owner, ordered by id.
    async fn list_todos(&self) -> Result<Vec<Todo>, AppError>;

    async fn list_todos_by_owner(&self, owner_id: i32) -> Result<Vec<Todo>, AppError>;

    async fn find_todo_by_id_and_owner(
        &self,
        id: i32,
        owner_id: i32,
    ) -> Result<Option<Todo>, AppError>;

    async fn create_todo(&self, owner_id: i32, input: &TodoInput) -> Result<Todo, AppError>;

    /// Returns `None` when no todo matches both `id` and `owner_id`.
    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError>;

    /// Returns `false` when no todo matches both `id` and `owner_id`.
    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<bool, AppError>;
}
