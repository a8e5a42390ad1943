use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string (profile store)
    pub database_url: String,

    /// Redis connection string (document-created event queue)
    pub redis_url: String,

    /// Base URL of the push delivery provider's HTTP API
    pub push_api_url: String,

    /// Bearer token for the push delivery provider
    pub push_api_key: String,

    /// Redis list key the relay consumes document-created events from
    pub event_queue_key: String,

    /// Redis list key malformed events are parked on
    pub dead_letter_key: String,

    /// BLPOP timeout in seconds for the relay's queue loop (default: 5)
    pub queue_poll_timeout_secs: u64,

    /// JWT secret for API authentication
    pub jwt_secret: String,

    /// JWT token expiry in hours
    pub jwt_expiry_hours: u64,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            push_api_url: std::env::var("PUSH_API_URL")
                .map_err(|_| anyhow::anyhow!("PUSH_API_URL environment variable is required"))?,
            push_api_key: std::env::var("PUSH_API_KEY")
                .map_err(|_| anyhow::anyhow!("PUSH_API_KEY environment variable is required"))?,
            event_queue_key: std::env::var("EVENT_QUEUE_KEY")
                .unwrap_or_else(|_| "events:document_created".to_string()),
            dead_letter_key: std::env::var("DEAD_LETTER_KEY")
                .unwrap_or_else(|_| "events:dead_letter".to_string()),
            queue_poll_timeout_secs: std::env::var("QUEUE_POLL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUEUE_POLL_TIMEOUT_SECS must be a valid u64"))?,
            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("JWT_EXPIRY_HOURS must be a valid u64"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        })
    }
}
