pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers the `/users` and `/tasks` scopes. Meant to be mounted under `/api`.
///
/// Register and login are public; logout and every task route go through
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(
            web::scope("/users")
                .service(users::register)
                .service(users::login)
                .service(users::logout),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Reports unparseable or incomplete JSON bodies as a `400` in the same
/// `{"error": ...}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(format!("Invalid request body: {}", err)).into()
        })
}

/// A task id that is not a UUID cannot name an existing task, so it gets the
/// same JSON `404` as an unknown one.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req: &HttpRequest| {
        log::debug!("Unparseable path {}: {}", req.path(), err);
        AppError::NotFound("Task not found".into()).into()
    })
}
