use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";
pub const DEFAULT_PORT: u16 = 8060;
/// Upper bound for `TOKEN_HOUR_LIFESPAN` (ten years).
pub const MAX_TOKEN_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return Ok(url.parse()?);
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_hours: i64,
}

impl JwtConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: get("DATABASE_URL").filter(|v| !v.is_empty()),
            host: or("DB_HOST", "localhost"),
            port: parse_or(get("DB_PORT"), 5432),
            user: or("DB_USER", "postgres"),
            password: or("DB_PASSWORD", "postgres"),
            name: or("DB_NAME", "movies_db"),
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), 10),
        };
        let jwt = JwtConfig {
            secret: or("JWT_SECRET", DEFAULT_JWT_SECRET),
            issuer: or("JWT_ISSUER", "movies-api"),
            ttl_hours: parse_or(get("TOKEN_HOUR_LIFESPAN"), 24),
        };
        anyhow::ensure!(!jwt.secret.is_empty(), "JWT_SECRET must not be empty");
        anyhow::ensure!(
            (1..=MAX_TOKEN_HOURS).contains(&jwt.ttl_hours),
            "TOKEN_HOUR_LIFESPAN must be between 1 and {MAX_TOKEN_HOURS}, got {}",
            jwt.ttl_hours
        );

        Ok(Self {
            database,
            jwt,
            host: or("APP_HOST", "0.0.0.0"),
            port: parse_or(get("PORT"), DEFAULT_PORT),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
