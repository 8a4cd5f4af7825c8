use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{keys, KvStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => anyhow::bail!("unknown role: {other}"),
        }
    }
}

/// A user record as stored in the `user:{id}` hash. Created once at
/// registration, never updated or deleted.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    fn to_fields(&self) -> Vec<(String, String)> {
        vec![
            ("id".into(), self.id.to_string()),
            ("username".into(), self.username.clone()),
            ("email".into(), self.email.clone()),
            // field name kept as "password"; the value is always a hash
            ("password".into(), self.password_hash.clone()),
            ("role".into(), self.role.as_str().into()),
        ]
    }

    fn from_fields(map: &HashMap<String, String>) -> anyhow::Result<Self> {
        let field = |name: &str| {
            map.get(name)
                .cloned()
                .with_context(|| format!("user hash missing field {name}"))
        };
        Ok(Self {
            id: field("id")?.parse().context("user id")?,
            username: field("username")?,
            email: field("email")?,
            password_hash: field("password")?,
            role: field("role")?.parse()?,
        })
    }

    /// Looks up the email index, then the record it points at. A dangling
    /// index entry reads as `None`.
    pub async fn find_by_email(store: &dyn KvStore, email: &str) -> anyhow::Result<Option<User>> {
        let Some(id) = store.get(&keys::user_email(email)).await? else {
            return Ok(None);
        };
        let id: Uuid = id.parse().context("user id in email index")?;
        Self::fetch(store, id).await
    }

    pub async fn fetch(store: &dyn KvStore, id: Uuid) -> anyhow::Result<Option<User>> {
        let map = store.hgetall(&keys::user(id)).await?;
        if map.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::from_fields(&map)?))
    }

    /// Writes the record hash, then the email index. Not atomic.
    pub async fn insert(&self, store: &dyn KvStore) -> anyhow::Result<()> {
        store.hset(&keys::user(self.id), self.to_fields()).await?;
        store
            .set(&keys::user_email(&self.email), &self.id.to_string())
            .await
    }
}
