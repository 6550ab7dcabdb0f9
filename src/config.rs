use std::net::IpAddr;

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub secret_key: String,
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub token_lifetime: Duration,
    pub max_body_size: usize,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, String> {
        match value {
            "development" => Ok(Environment::Development),
            "testing" => Ok(Environment::Testing),
            "production" => Ok(Environment::Production),
            other => Err(format!("Invalid PLATO_ENV: {other}")),
        }
    }

    fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Testing => "warn",
            Environment::Production => "info",
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let secret_key = required("SECRET_KEY")?;

        let environment = Environment::parse(&or("PLATO_ENV", "development"))?;

        let host: IpAddr = or("PLATO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PLATO_HOST: {e}"))?;

        let port: u16 = or("PLATO_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid PLATO_PORT: {e}"))?;

        let days: i64 = or("PLATO_TOKEN_EXPIRATION_DAYS", "30")
            .parse()
            .map_err(|e| format!("Invalid PLATO_TOKEN_EXPIRATION_DAYS: {e}"))?;
        let seconds: i64 = or("PLATO_TOKEN_EXPIRATION_SECONDS", "0")
            .parse()
            .map_err(|e| format!("Invalid PLATO_TOKEN_EXPIRATION_SECONDS: {e}"))?;
        let token_lifetime = Duration::days(days) + Duration::seconds(seconds);
        if token_lifetime <= Duration::zero() {
            return Err("Token lifetime must be positive".to_string());
        }

        let max_body_size: usize = or("PLATO_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid PLATO_MAX_BODY_SIZE: {e}"))?;

        let log_level = or("PLATO_LOG_LEVEL", environment.default_log_level());

        Ok(Config {
            database_url,
            secret_key,
            environment,
            host,
            port,
            token_lifetime,
            max_body_size,
            log_level,
        })
    }
}
