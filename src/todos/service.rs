use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateTodoRequest, UpdateTodoRequest};
use super::repo::{Todo, TodoStatus};
use crate::error::AppError;
use crate::store::{keys, KvStore};
use crate::users::Role;

/// An admin may act on any record; anyone else only on records whose stored
/// owner matches. The owner is always re-read from the store, never taken
/// from the request.
fn authorized(todo: &Todo, requester: Uuid, role: Role) -> bool {
    role.is_admin() || todo.user_id == requester
}

pub async fn create_todo(
    store: &dyn KvStore,
    owner: Uuid,
    req: CreateTodoRequest,
) -> Result<Todo, AppError> {
    let todo = Todo {
        id: Uuid::new_v4(),
        user_id: owner,
        title: req.title,
        description: req.description.unwrap_or_default(),
        status: TodoStatus::Pending,
        created_at: OffsetDateTime::now_utc(),
    };
    todo.insert(store).await?;
    info!(todo_id = %todo.id, user_id = %owner, "todo created");
    Ok(todo)
}

pub async fn list_todos(
    store: &dyn KvStore,
    requester: Uuid,
    role: Role,
) -> Result<Vec<Todo>, AppError> {
    let ids = if role.is_admin() {
        store.smembers(keys::ALL_TODOS).await?
    } else {
        store.smembers(&keys::user_todos(requester)).await?
    };

    let mut todos = Vec::with_capacity(ids.len());
    for raw in ids {
        let Ok(id) = raw.parse::<Uuid>() else {
            warn!(id = %raw, "skipping malformed id in todo index");
            continue;
        };
        // a dangling index entry reads back as an empty hash; skip it
        if let Some(todo) = Todo::fetch(store, id).await? {
            todos.push(todo);
        }
    }
    Ok(todos)
}

pub async fn update_todo(
    store: &dyn KvStore,
    todo_id: Uuid,
    requester: Uuid,
    role: Role,
    req: UpdateTodoRequest,
) -> Result<Todo, AppError> {
    let todo = Todo::fetch(store, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    if !authorized(&todo, requester, role) {
        warn!(todo_id = %todo_id, user_id = %requester, "update denied");
        return Err(AppError::Forbidden("Access denied".into()));
    }

    if !req.is_empty() {
        let status = req.status_value()?;
        let mut fields = Vec::new();
        if let Some(title) = req.title {
            fields.push(("title".to_string(), title));
        }
        if let Some(description) = req.description {
            fields.push(("description".to_string(), description));
        }
        if let Some(status) = status {
            fields.push(("status".to_string(), status.as_str().to_string()));
        }
        Todo::write_fields(store, todo_id, fields).await?;
    }

    let updated = Todo::fetch(store, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;
    info!(todo_id = %todo_id, user_id = %requester, "todo updated");
    Ok(updated)
}

pub async fn delete_todo(
    store: &dyn KvStore,
    todo_id: Uuid,
    requester: Uuid,
    role: Role,
) -> Result<(), AppError> {
    let todo = Todo::fetch(store, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    if !authorized(&todo, requester, role) {
        warn!(todo_id = %todo_id, user_id = %requester, "delete denied");
        return Err(AppError::Forbidden("Access denied".into()));
    }

    todo.remove(store).await?;
    info!(todo_id = %todo_id, user_id = %requester, "todo deleted");
    Ok(())
}
