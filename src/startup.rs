use crate::shutdown;
use kalenteri::api::{self, AppState};
use kalenteri::config::{Config, StoreBackend};
use kalenteri::error::Error;
use kalenteri::events::{EventService, EventStore, InMemoryStore, RedisStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the server configuration
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Configuration loaded: bind={} backend={:?}",
                config.bind_address(),
                config.store_backend
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Pick the event store, falling back to memory when Redis is unreachable
pub async fn build_store(config: &Config) -> Arc<dyn EventStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory event store");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Redis => {
            match RedisStore::connect(&config.redis_url, &config.key_prefix).await {
                Ok(store) => {
                    info!("Connected to Redis successfully");
                    Arc::new(store)
                }
                Err(e) => {
                    error!("Failed to connect to Redis: {}", e);
                    info!("Using in-memory event store as fallback");
                    Arc::new(InMemoryStore::new())
                }
            }
        }
    }
}

/// Build the API and serve it until shutdown
pub async fn start_server(config: Config) -> miette::Result<()> {
    let store = build_store(&config).await;
    let state = AppState::new(EventService::new(store));
    let app = api::router(state, config.body_limit_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
