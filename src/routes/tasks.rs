use crate::{
    auth::{ensure_owner, AuthenticatedUserId},
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Retrieves the authenticated user's tasks, newest first.
///
/// Scoping happens in the store query, so no per-task ownership check is needed.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = store.list_tasks(user.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new, incomplete task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters (required).
/// - `description` (optional): up to 1000 characters.
///
/// ## Responses:
/// - `200 OK`: the created `Task`.
/// - `400 Bad Request`: body is not valid JSON for `TaskInput`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: field validation failed.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .insert_task(Task::new(task_data.into_inner(), user.0))
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task owned by the authenticated user.
///
/// Only the fields present in the body change. The task is loaded before the
/// ownership check, so an unknown id is always a 404.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `401 Unauthorized`: missing or invalid token, or the caller is not the owner.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: field validation failed.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .find_task(task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    ensure_owner(&task, user.0)?;

    let updated = store.save_task(task.apply(task_data.into_inner())).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task removed"}`.
/// - `401 Unauthorized`: missing or invalid token, or the caller is not the owner.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store
        .find_task(task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    ensure_owner(&task, user.0)?;

    if !store.delete_task(task.id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Task removed" })))
}
