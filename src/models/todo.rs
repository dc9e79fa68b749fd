use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating or replacing a todo.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// 1 (lowest) to 5 (highest).
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1-5"))]
    pub priority: i32,

    pub complete: bool,
}

/// A todo as stored in the `todos` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: i32,
    pub complete: bool,
    /// Id of the user who created the todo.
    pub owner_id: i32,
}

impl Todo {
    pub fn new(id: i32, input: &TodoInput, owner_id: i32) -> Self {
        Self {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority,
            complete: input.complete,
            owner_id,
        }
    }

    /// Overwrites every user-editable field; `id` and `owner_id` never change.
    pub fn apply(&mut self, input: &TodoInput) {
        self.title = input.title.clone();
        self.description = input.description.clone();
        self.priority = input.priority;
        self.complete = input.complete;
    }
}
