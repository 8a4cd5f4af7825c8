use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateTodoRequest, UpdateTodoRequest};
use super::service;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
}

#[instrument(skip(state, payload))]
async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;
    let todo = service::create_todo(state.store.as_ref(), user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "todo": todo }
        })),
    ))
}

#[instrument(skip(state))]
async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let todos = service::list_todos(state.store.as_ref(), user.id, user.role).await?;
    Ok(Json(json!({
        "status": "success",
        "results": todos.len(),
        "data": { "todos": todos }
    })))
}

#[instrument(skip(state, payload))]
async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    let todo = service::update_todo(state.store.as_ref(), id, user.id, user.role, payload).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "todo": todo }
    })))
}

#[instrument(skip(state))]
async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service::delete_todo(state.store.as_ref(), id, user.id, user.role).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Todo deleted successfully"
    })))
}
