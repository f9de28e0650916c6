//! # Carevault Core
//!
//! Startup wiring shared by the Carevault binaries:
//! - configuration resolved once from the environment
//! - construction of the configured content store
//!
//! **No API concerns**: HTTP routing and wire types belong in `api-rest` and `api-shared`.

pub mod config;
pub mod constants;

pub use config::{BackendKind, CoreConfig, StorageBackend};
pub use cv_files::{ContentId, ContentStore, IpfsStore, LocalStore, StorageError, StoredBlob};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to open content store: {0}")]
    Storage(#[from] StorageError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Build the content store selected by `cfg`.
///
/// The local backend creates its root directory if needed. The IPFS backend is not contacted
/// until the first upload.
pub async fn open_store(cfg: &CoreConfig) -> CoreResult<Arc<dyn ContentStore>> {
    let store: Arc<dyn ContentStore> = match cfg.storage() {
        StorageBackend::Local { store_dir } => Arc::new(LocalStore::new(store_dir).await?),
        StorageBackend::Ipfs { api_url } => Arc::new(IpfsStore::new(api_url.clone())),
    };

    tracing::info!(backend = store.backend(), "content store ready");
    Ok(store)
}
