use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, hashed_password, is_active";
const TODO_COLUMNS: &str = "id, title, description, priority, complete, owner_id";

/// PostgreSQL-backed store. Each call checks a connection out of the pool for its own
/// duration; writes run in a transaction committed before the call returns.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the `users` and `todos` tables when they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                 id SERIAL PRIMARY KEY,
                 username VARCHAR NOT NULL UNIQUE,
                 email VARCHAR NULL,
                 first_name VARCHAR NOT NULL,
                 last_name VARCHAR NOT NULL,
                 hashed_password VARCHAR NOT NULL,
                 is_active BOOLEAN NOT NULL DEFAULT TRUE
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                 id SERIAL PRIMARY KEY,
                 title VARCHAR NOT NULL,
                 description VARCHAR NULL,
                 priority INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 5),
                 complete BOOLEAN NOT NULL DEFAULT FALSE,
                 owner_id INTEGER NOT NULL REFERENCES users (id)
             )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, first_name, last_name, hashed_password, is_active)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.hashed_password)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(todos)
    }

    async fn list_todos_by_owner(&self, owner_id: i32) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn find_todo_by_id_and_owner(
        &self,
        id: i32,
        owner_id: i32,
    ) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn create_todo(&self, owner_id: i32, input: &TodoInput) -> Result<Todo, AppError> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, priority, complete, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority)
        .bind(input.complete)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET title = $1, description = $2, priority = $3, complete = $4
             WHERE id = $5 AND owner_id = $6
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority)
        .bind(input.complete)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(todo)
    }

    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
