use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is not set")]
    MissingDatabaseUrl,

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Run the idempotent schema initializer before serving.
    pub auto_init_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 8888)?,
            db_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            auto_init_schema: parse_var("AUTO_INIT_SCHEMA", true)?,
        })
    }

    /// Config for a given connection string with defaults for everything else.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 8888,
            db_max_connections: 5,
            auto_init_schema: false,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let mut config = Config::with_database_url("postgres://localhost/wellness");
        config.host = "0.0.0.0".into();
        config.port = 9000;
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_with_database_url_defaults() {
        let config = Config::with_database_url("postgres://localhost/wellness");
        assert_eq!(config.database_url, "postgres://localhost/wellness");
        assert_eq!(config.db_max_connections, 5);
        assert!(!config.auto_init_schema);
    }
}
