//! Ownership checks for task mutations.
//!
//! Handlers load the task first and call [`ensure_owner`] afterwards, so a missing
//! task surfaces as 404 before ownership is ever considered. A non-owner gets the
//! same 401 status as an unauthenticated caller.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;

pub fn ensure_owner(task: &Task, user_id: Uuid) -> Result<(), AppError> {
    if task.user_id == user_id {
        Ok(())
    } else {
        log::warn!("User {} attempted to modify task {} owned by {}", user_id, task.id, task.user_id);
        Err(AppError::Unauthorized("User not authorized".into()))
    }
}
