use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use messages_service::{
    config::{Config, StorageBackend},
    db::Database,
    middleware::init_tracing,
    routes::create_router,
    service::MessageService,
    store::{MemoryStore, MessageStore},
};

#[tokio::main]
async fn main() {
    // .env may select the environment, so load it before picking a log format
    dotenvy::dotenv().ok();

    // Tracing is not up yet, so configuration errors go to stderr
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&config.environment) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }
    info!(environment = ?config.environment, "Configuration loaded successfully");

    // Build the store once and inject it into the service
    let (store, database): (Arc<dyn MessageStore>, Option<Database>) = match config.storage {
        StorageBackend::Postgres(ref database_config) => {
            let database = match Database::new(database_config.clone()).await {
                Ok(db) => {
                    info!("Database connection established");
                    db
                }
                Err(e) => {
                    error!("Failed to connect to database: {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = database.migrate().await {
                error!("Failed to run database migrations: {}", e);
                std::process::exit(1);
            }

            let store: Arc<dyn MessageStore> = Arc::new(database.clone());
            (store, Some(database))
        }
        StorageBackend::Memory => {
            info!("Using in-memory message store; data will not survive a restart");
            let store: Arc<dyn MessageStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    let service = Arc::new(MessageService::new(store));
    let app = create_router(service, config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    if let Some(database) = database {
        database.close();
    }

    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
