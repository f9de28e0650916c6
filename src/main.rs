use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use cv_core::{CoreConfig, StorageBackend, open_store};

/// Main entry point for the Carevault service
///
/// Resolves configuration from the environment (after loading `.env` if present), opens the
/// configured content store and serves the REST API until Ctrl-C.
///
/// # Environment Variables
/// - `CV_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CV_STORAGE_BACKEND`: `local` or `ipfs` (default: "local")
/// - `CV_STORE_DIR`: root directory for the local store (default: "blob_store")
/// - `CV_IPFS_API_URL`: IPFS node API URL (default: "http://127.0.0.1:5001")
/// - `CV_UPLOAD_LIMIT_BYTES`: optional request body cap (default: unlimited)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is invalid or the content store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_lookup(|key| std::env::var(key).ok())?;

    match cfg.storage() {
        StorageBackend::Local { store_dir } => {
            tracing::info!("++ Using local store at {}", store_dir.display())
        }
        StorageBackend::Ipfs { api_url } => tracing::info!("++ Using IPFS node at {}", api_url),
    }
    match cfg.upload_limit_bytes() {
        Some(limit) => tracing::info!("++ Request bodies capped at {} bytes", limit),
        None => tracing::info!("++ Request bodies uncapped"),
    }

    let store = open_store(&cfg).await?;
    let app = router(AppState::new(store), cfg.upload_limit_bytes());

    tracing::info!("++ Starting Carevault REST on {}", cfg.rest_addr());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Carevault REST stopped");
    Ok(())
}

/// `RUST_LOG` plus defaults for the workspace crates and per-request spans from `TraceLayer`,
/// which logs under `tower_http` at debug.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("carevault_run=info".parse()?)
        .add_directive("api_rest=info".parse()?)
        .add_directive("cv_core=info".parse()?)
        .add_directive("cv_files=info".parse()?)
        .add_directive("tower_http=debug".parse()?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_enables_request_tracing() {
        let filter = log_filter().unwrap().to_string().to_ascii_lowercase();

        assert!(filter.contains("tower_http=debug"));
        assert!(filter.contains("api_rest=info"));
    }
}
