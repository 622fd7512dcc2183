//! Persistence for users and tasks.
//!
//! Handlers only see the [`Store`] trait, registered as `web::Data<dyn Store>`.
//! [`PgStore`] backs it with PostgreSQL; [`MemoryStore`] keeps everything in
//! process and is used when no database is configured and in tests.
//!
//! Every call is attempted once. Failures are returned to the handler as
//! `AppError` and never retried.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. Fails with `AppError::BadRequest` if the username or email
    /// is already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Looks up an account by email. Matching ignores case; emails are stored
    /// in the form returned by `normalize_email`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Exact, case-sensitive username lookup.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Tasks owned by `owner`, newest first.
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, AppError>;

    /// Persists a freshly built task and returns it as stored.
    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    /// `None` when no task has that id, whoever the owner would be.
    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Overwrites the stored task with the same id. Last writer wins.
    async fn save_task(&self, task: Task) -> Result<Task, AppError>;

    /// Returns `false` if no task had that id.
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;
}

pub(crate) fn duplicate_user() -> AppError {
    AppError::BadRequest("User already exists".into())
}
