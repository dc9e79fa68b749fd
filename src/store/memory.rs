use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::Store;
use crate::error::AppError;
use crate::models::{NewUser, Todo, TodoInput, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    todos: BTreeMap<i32, Todo>,
    last_user_id: i32,
    last_todo_id: i32,
}

/// A process-local store. Ids are assigned sequentially from 1, like `SERIAL` columns.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(AppError::BadRequest("Username already registered".into()));
        }

        tables.last_user_id += 1;
        let created = User {
            id: tables.last_user_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            hashed_password: user.hashed_password,
            is_active: true,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.todos.values().cloned().collect())
    }

    async fn list_todos_by_owner(&self, owner_id: i32) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_todo_by_id_and_owner(
        &self,
        id: i32,
        owner_id: i32,
    ) -> Result<Option<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn create_todo(&self, owner_id: i32, input: &TodoInput) -> Result<Todo, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(AppError::DatabaseError(format!(
                "owner {} does not exist",
                owner_id
            )));
        }

        tables.last_todo_id += 1;
        let todo = Todo::new(tables.last_todo_id, input, owner_id);
        tables.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: i32,
        owner_id: i32,
        input: &TodoInput,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .todos
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
            .map(|todo| {
                todo.apply(input);
                todo.clone()
            }))
    }

    async fn delete_todo(&self, id: i32, owner_id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.todos.get(&id) {
            Some(todo) if todo.owner_id == owner_id => {
                tables.todos.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
