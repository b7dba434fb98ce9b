use std::env;

pub const DEFAULT_GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1";

/// Only used by debug builds when JWT_SECRET is unset
const DEV_JWT_SECRET: &str = "shelfmark-dev-secret";

/// Upper bound for TOKEN_TTL_HOURS (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub google_books_api_key: Option<String>,
    pub google_books_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => return Err("JWT_SECRET environment variable must be set in production".into()),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://shelfmark.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            jwt_secret,
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .filter(|h: &i64| *h > 0)
                .map(|h| {
                    if h > MAX_TOKEN_TTL_HOURS {
                        tracing::warn!("TOKEN_TTL_HOURS={} capped to {}", h, MAX_TOKEN_TTL_HOURS);
                    }
                    h.min(MAX_TOKEN_TTL_HOURS)
                })
                .unwrap_or(24),
            google_books_api_key: env::var("GOOGLE_BOOKS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            google_books_base_url: env::var("GOOGLE_BOOKS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_BOOKS_URL.to_string()),
        })
    }

    /// Configuration for an in-memory database, used by tests and tooling
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            cors_allowed_origins: Vec::new(),
            jwt_secret: jwt_secret.to_string(),
            token_ttl_hours: 24,
            google_books_api_key: None,
            google_books_base_url: DEFAULT_GOOGLE_BOOKS_URL.to_string(),
        }
    }
}
