//! authfront server binary.
//!
//! Loads configuration, opens the configured client store, and serves the
//! client registration and authorization endpoints with graceful shutdown.

use anyhow::Result;
use authfront::{
    config::Config,
    http::{AppState, build_router},
    oauth::{AuthorizationValidator, ClientRegistry, hashing::Argon2SecretHasher},
    storage::{create_client_store, parse_storage_backend},
};
use std::{env, sync::Arc};

use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "authfront=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = authfront::config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting authfront");

    let config = Config::new()?;

    // Parse storage backend configuration
    let storage_backend =
        parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    let client_store = create_client_store(storage_backend).await?;
    let registered_clients = client_store.count_clients().await?;
    tracing::info!(
        backend = %config.storage_backend,
        registered_clients,
        "client store ready"
    );

    let hasher = Arc::new(Argon2SecretHasher::new(
        *config.secret_hash_cost.as_ref(),
        config.secret_hash_pepper.as_ref().clone(),
    )?);
    let client_registry = Arc::new(ClientRegistry::new(client_store, hasher));

    // Create application context
    let app_context = AppState {
        config: Arc::new(config.clone()),
        client_registry,
        validator: AuthorizationValidator::new(),
    };

    // Build the router
    let app = build_router(app_context);

    let bind_address = format!("0.0.0.0:{}", config.http_port.as_ref());
    let listener = TcpListener::bind(&bind_address).await?;

    // Setup graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    {
        let tracker = tracker.clone();
        let inner_token = token.clone();

        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut terminate) => {
                    terminate.recv().await;
                }
                Err(err) => {
                    tracing::error!("failed to install signal handler: {}", err);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::spawn(async move {
            tokio::select! {
                () = inner_token.cancelled() => { },
                _ = terminate => {},
                _ = ctrl_c => {},
            }

            tracker.close();
            inner_token.cancel();
        });
    }

    // Start HTTP server
    {
        let inner_token = token.clone();
        tracker.spawn(async move {
            tracing::info!("Starting server on {bind_address}");

            let shutdown_token = inner_token.clone();
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    tokio::select! {
                        () = shutdown_token.cancelled() => { }
                    }
                    tracing::info!("axum graceful shutdown complete");
                })
                .await;
            if let Err(err) = result {
                tracing::error!("axum task failed: {}", err);
            }

            inner_token.cancel();
        });
    }

    tracker.wait().await;

    Ok(())
}
