use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Process settings, read from the environment (and `.env` through dotenvy).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub secret: String,
    pub access_token_exp_sec: i64,
    pub refresh_token_exp_day: i64,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
    pub bcrypt_cost: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("access_token_exp_sec", 300)?
            .set_default("refresh_token_exp_day", 1)?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("pool_size", 10)?
            .set_default("bcrypt_cost", bcrypt::DEFAULT_COST as i64)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
impl Settings {
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/unused".to_string(),
            secret: "test-secret-for-testing-only".to_string(),
            access_token_exp_sec: 300,
            refresh_token_exp_day: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            pool_size: 1,
            bcrypt_cost: 4,
        }
    }
}
