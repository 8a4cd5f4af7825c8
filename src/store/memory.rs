use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KvStore;

#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
}

impl Entry {
    fn type_name(&self) -> &'static str {
        match self {
            Entry::Str(_) => "string",
            Entry::Hash(_) => "hash",
            Entry::Set(_) => "set",
        }
    }
}

/// In-process store keeping everything behind one `RwLock`. Requests are
/// short get/set sequences, so a single lock is plenty at the volumes this
/// service handles.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn wrong_type(key: &str, want: &str, found: &Entry) -> anyhow::Error {
    anyhow::anyhow!(
        "wrong type for key {key}: expected {want}, found {}",
        found.type_name()
    )
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Str(v)) => Ok(Some(v.clone())),
            Some(other) => Err(wrong_type(key, "string", other)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::Str(value.to_string()));
        Ok(())
    }

    async fn del(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn hset(&self, key: &str, fields: Vec<(String, String)>) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()))
        {
            Entry::Hash(map) => {
                map.extend(fields);
                Ok(())
            }
            other => Err(wrong_type(key, "hash", other)),
        }
    }

    async fn hgetall(&self, key: &str) -> anyhow::Result<HashMap<String, String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(map)) => Ok(map.clone()),
            Some(other) => Err(wrong_type(key, "hash", other)),
        }
    }

    async fn sadd(&self, key: &str, member: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        match entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(HashSet::new()))
        {
            Entry::Set(set) => {
                set.insert(member.to_string());
                Ok(())
            }
            other => Err(wrong_type(key, "set", other)),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            None => Ok(()),
            Some(Entry::Set(set)) => {
                set.remove(member);
                Ok(())
            }
            Some(other) => Err(wrong_type(key, "set", other)),
        }
    }

    async fn smembers(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(other) => Err(wrong_type(key, "set", other)),
        }
    }
}
