use axum::Router;

use crate::state::AppState;

mod dto;
mod handlers;
mod repo;
pub mod service;

pub use dto::{LoginRequest, PublicUser, RegisterRequest};
pub use repo::{Role, User};

pub fn router() -> Router<AppState> {
    handlers::router()
}
