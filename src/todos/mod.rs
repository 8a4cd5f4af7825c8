use axum::Router;

use crate::state::AppState;

mod dto;
mod handlers;
mod repo;
pub mod service;

pub use dto::{CreateTodoRequest, UpdateTodoRequest};
pub use repo::{Todo, TodoStatus};

pub fn router() -> Router<AppState> {
    handlers::router()
}
