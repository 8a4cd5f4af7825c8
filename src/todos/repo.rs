use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::store::{keys, KvStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoStatus::Pending),
            "in-progress" => Ok(TodoStatus::InProgress),
            "completed" => Ok(TodoStatus::Completed),
            other => anyhow::bail!("unknown todo status: {other}"),
        }
    }
}

/// A task record as stored in the `todo:{id}` hash. Owner and creation time
/// are fixed at creation; everything else may be updated by the owner or an
/// admin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Todo {
    fn to_fields(&self) -> anyhow::Result<Vec<(String, String)>> {
        Ok(vec![
            ("id".into(), self.id.to_string()),
            ("userId".into(), self.user_id.to_string()),
            ("title".into(), self.title.clone()),
            ("description".into(), self.description.clone()),
            ("status".into(), self.status.as_str().into()),
            ("createdAt".into(), self.created_at.format(&Rfc3339)?),
        ])
    }

    fn from_fields(map: &HashMap<String, String>) -> anyhow::Result<Self> {
        let field = |name: &str| {
            map.get(name)
                .cloned()
                .with_context(|| format!("todo hash missing field {name}"))
        };
        Ok(Self {
            id: field("id")?.parse().context("todo id")?,
            user_id: field("userId")?.parse().context("todo owner id")?,
            title: field("title")?,
            description: field("description")?,
            status: field("status")?.parse()?,
            created_at: OffsetDateTime::parse(&field("createdAt")?, &Rfc3339)
                .context("todo createdAt")?,
        })
    }

    /// Reads the record hash; an absent or dangling id reads as `None`.
    pub async fn fetch(store: &dyn KvStore, id: Uuid) -> anyhow::Result<Option<Todo>> {
        let map = store.hgetall(&keys::todo(id)).await?;
        if map.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::from_fields(&map)?))
    }

    /// Writes the record, then adds its id to the owner's set and the global
    /// set. The three writes are not grouped; readers tolerate the gap.
    pub async fn insert(&self, store: &dyn KvStore) -> anyhow::Result<()> {
        let id = self.id.to_string();
        store.hset(&keys::todo(self.id), self.to_fields()?).await?;
        store.sadd(&keys::user_todos(self.user_id), &id).await?;
        store.sadd(keys::ALL_TODOS, &id).await
    }

    pub async fn write_fields(
        store: &dyn KvStore,
        id: Uuid,
        fields: Vec<(String, String)>,
    ) -> anyhow::Result<()> {
        store.hset(&keys::todo(id), fields).await
    }

    /// Deletes the record and both index entries. The owner set is keyed by
    /// the stored owner id, not the requester.
    pub async fn remove(&self, store: &dyn KvStore) -> anyhow::Result<()> {
        let id = self.id.to_string();
        store.del(&keys::todo(self.id)).await?;
        store.srem(&keys::user_todos(self.user_id), &id).await?;
        store.srem(keys::ALL_TODOS, &id).await
    }
}
