//! Carevault blob storage
//!
//! Uploaded files are handed to a content-addressed store, which returns an opaque identifier
//! derived from the bytes. Callers depend only on the [`ContentStore`] trait so the backend can be
//! swapped at startup or replaced in tests.
//!
//! ## Backends
//!
//! - [`LocalStore`] keeps blobs on the local filesystem, addressed by SHA-256:
//!
//! ```text
//! <root>/
//! └── sha256/
//!     └── ab/
//!         └── cd/
//!             └── abcd3f9e…
//! ```
//!
//! - [`IpfsStore`] forwards blobs to an IPFS node through its HTTP API and returns the node's CID.
//!
//! ## Example Usage
//!
//! ```no_run
//! use cv_files::{ContentStore, LocalStore};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), cv_files::StorageError> {
//! let store = LocalStore::new(Path::new("blob_store")).await?;
//! let blob = store.store(b"test data".to_vec()).await?;
//! println!("stored as {}", blob.cid);
//! # Ok(())
//! # }
//! ```

mod content_id;
mod ipfs;
mod local;

pub use content_id::ContentId;
pub use ipfs::IpfsStore;
pub use local::LocalStore;

use async_trait::async_trait;

/// Errors that can occur while storing blobs
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Store root exists but cannot be used
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request to the remote node could not be completed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote node answered with a non-success status
    #[error("storage node rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Remote node answered with something other than the expected reply
    #[error("invalid response from storage node: {0}")]
    InvalidResponse(String),

    /// Identifier text was empty
    #[error("invalid content identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result of a successful store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Identifier assigned by the backend
    pub cid: ContentId,

    /// Number of bytes stored
    pub size_bytes: u64,

    /// Best-effort media type sniffed from the content. Not authoritative.
    pub media_type: Option<&'static str>,
}

impl StoredBlob {
    pub(crate) fn describe(cid: ContentId, bytes: &[u8]) -> Self {
        Self {
            cid,
            size_bytes: bytes.len() as u64,
            media_type: infer::get(bytes).map(|kind| kind.mime_type()),
        }
    }
}

/// Content-addressed storage backend.
///
/// Implementations take ownership of the full byte content and return the identifier under
/// which it can later be found. Identical content must yield identical identifiers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores `bytes` and returns the identifier assigned to them.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot persist the content.
    async fn store(&self, bytes: Vec<u8>) -> Result<StoredBlob, StorageError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
