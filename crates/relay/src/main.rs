use std::sync::Arc;

use savora_common::config::AppConfig;
use savora_common::db;
use savora_common::redis_pool;
use savora_dispatch::handler::NotificationHandlers;
use savora_relay::listener::EventListener;
use savora_relay::pg_store::PgProfileStore;
use savora_relay::push_client::HttpPushClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "savora_relay=info,savora_dispatch=info".into()),
        )
        .json()
        .init();

    tracing::info!("Savora relay starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to the profile store
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Connect to the event queue
    let redis = redis_pool::create_redis_pool(&config.redis_url).await?;

    // Wire the dispatch pipeline
    let store = Arc::new(PgProfileStore::new(pool));
    let delivery = Arc::new(HttpPushClient::new(
        config.push_api_url.clone(),
        config.push_api_key.clone(),
    )?);
    let handlers = Arc::new(NotificationHandlers::new(store, delivery));

    let mut listener = EventListener::new(
        redis,
        handlers,
        config.event_queue_key.clone(),
        config.dead_letter_key.clone(),
        config.queue_poll_timeout_secs,
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = listener.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Event listener exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Savora relay stopped.");
    Ok(())
}
