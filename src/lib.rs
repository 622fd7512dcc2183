#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Task tracking API: users register and log in for a signed token, then create,"]
#![doc = "list, update and delete their own tasks. The binary (`main.rs`) wires these"]
#![doc = "modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
