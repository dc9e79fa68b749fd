use crate::{
    auth::{authorize_owner, CurrentUser, Identity},
    error::AppError,
    models::{Todo, TodoInput},
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

fn todo_not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Loads a todo only if it exists and belongs to `identity`; anything else is a 404.
async fn find_owned_todo(
    store: &dyn Store,
    todo_id: i32,
    identity: &Identity,
) -> Result<Todo, AppError> {
    store
        .find_todo_by_id_and_owner(todo_id, identity.user_id)
        .await?
        .filter(|todo| authorize_owner(todo.owner_id, identity))
        .ok_or_else(todo_not_found)
}

/// Lists every todo in the system.
///
/// This route takes no credentials and applies no owner filter.
#[get("/")]
pub async fn read_all(store: web::Data<dyn Store>) -> Result<impl Responder, AppError> {
    let todos = store.list_todos().await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Lists the todos owned by the authenticated caller.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Todo`.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("/user")]
pub async fn read_all_by_user(
    store: web::Data<dyn Store>,
    CurrentUser(identity): CurrentUser,
) -> Result<impl Responder, AppError> {
    let todos = store.list_todos_by_owner(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Retrieves one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
#[get("/{todo_id}")]
pub async fn read_todo(
    store: web::Data<dyn Store>,
    CurrentUser(identity): CurrentUser,
    todo_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let todo = find_owned_todo(store.get_ref(), todo_id.into_inner(), &identity).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Creates a todo owned by the caller.
///
/// `CurrentUser` is extracted ahead of the body, so an anonymous request is a 401
/// whatever it carries.
///
/// ## Responses:
/// - `201 Created`: the stored `Todo`.
/// - `400 Bad Request`: the body is not a `TodoInput`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: e.g. priority outside 1-5. Nothing is stored.
#[post("/")]
pub async fn create_todo(
    store: web::Data<dyn Store>,
    CurrentUser(identity): CurrentUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = store.create_todo(identity.user_id, &todo_data).await?;
    log::debug!("user {} created todo {}", identity.user_id, todo.id);

    Ok(HttpResponse::Created().json(todo))
}

/// Replaces the fields of one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
/// - `422 Unprocessable Entity`: input validation failed.
#[put("/{todo_id}")]
pub async fn update_todo(
    store: web::Data<dyn Store>,
    CurrentUser(identity): CurrentUser,
    todo_id: web::Path<i32>,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let todo = find_owned_todo(store.get_ref(), todo_id.into_inner(), &identity).await?;

    let updated = store
        .update_todo(todo.id, identity.user_id, &todo_data)
        .await?
        .ok_or_else(todo_not_found)?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes one of the caller's todos.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such todo (including one already deleted), or it belongs to someone else.
#[delete("/{todo_id}")]
pub async fn delete_todo(
    store: web::Data<dyn Store>,
    CurrentUser(identity): CurrentUser,
    todo_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let todo = find_owned_todo(store.get_ref(), todo_id.into_inner(), &identity).await?;

    if !store.delete_todo(todo.id, identity.user_id).await? {
        return Err(todo_not_found());
    }
    log::debug!("user {} deleted todo {}", identity.user_id, todo.id);

    Ok(HttpResponse::NoContent().finish())
}
