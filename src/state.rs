use std::sync::Arc;

use crate::config::{AppConfig, Environment, JwtConfig};
use crate::store::{KvStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(MemoryStore::new()) as Arc<dyn KvStore>;
        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn KvStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State over a fresh in-memory store with fixed JWT settings, for tests.
    pub fn for_tests() -> Self {
        let config = Arc::new(AppConfig {
            environment: Environment::Development,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60,
            },
            rate_limit_per_second: 6,
            rate_limit_burst: 100,
        });
        let store = Arc::new(MemoryStore::new()) as Arc<dyn KvStore>;
        Self { store, config }
    }
}
