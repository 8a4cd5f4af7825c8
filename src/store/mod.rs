//! Key-value store seam.
//!
//! Entities are persisted as field maps (hashes) plus membership sets used as
//! indices, under the key conventions in [`keys`]. The trait keeps the rest of
//! the crate independent of the concrete backend; [`MemoryStore`] is the
//! in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;

mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn del(&self, key: &str) -> anyhow::Result<()>;

    /// Writes fields into the hash at `key`, creating it if absent. Existing
    /// fields not named in `fields` are left untouched.
    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> anyhow::Result<()>;

    /// Returns the full hash at `key`, or an empty map if the key is absent.
    async fn hgetall(&self, key: &str) -> anyhow::Result<HashMap<String, String>>;

    async fn sadd(&self, key: &str, member: &str) -> anyhow::Result<()>;
    async fn srem(&self, key: &str, member: &str) -> anyhow::Result<()>;

    /// Members of the set at `key`, empty if the key is absent. No ordering
    /// guarantee.
    async fn smembers(&self, key: &str) -> anyhow::Result<Vec<String>>;
}

/// Key conventions shared by the user and todo repositories.
///
/// Every todo id in a `user_todos` set should have a `todo` hash and appear in
/// [`keys::ALL_TODOS`]; readers tolerate dangling ids (the hash comes back
/// empty and is skipped) since record and index writes are not atomic.
pub mod keys {
    use uuid::Uuid;

    pub const ALL_TODOS: &str = "todos:all";

    pub fn user(id: Uuid) -> String {
        format!("user:{id}")
    }

    pub fn user_email(email: &str) -> String {
        format!("user:email:{email}")
    }

    pub fn user_todos(id: Uuid) -> String {
        format!("user:{id}:todos")
    }

    pub fn todo(id: Uuid) -> String {
        format!("todo:{id}")
    }
}
