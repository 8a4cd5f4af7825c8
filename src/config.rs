use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

/// Records the runtime environment once at startup. Later calls are ignored.
pub fn set_environment(env: Environment) {
    let _ = ENVIRONMENT.set(env);
}

/// True unless the process was started with `APP_ENV=production`. Controls
/// whether internal error detail is included in responses.
pub fn dev_mode() -> bool {
    !matches!(ENVIRONMENT.get(), Some(Environment::Production))
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "taskpad".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "taskpad-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        // zero would make the limiter config unbuildable, so clamp to 1
        let rate_limit_per_second = std::env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(6)
            .max(1);
        let rate_limit_burst = std::env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(100)
            .max(1);
        Ok(Self {
            environment,
            jwt,
            rate_limit_per_second,
            rate_limit_burst,
        })
    }
}
