//! Filesystem-backed content-addressed store
//!
//! Blobs are stored under their SHA-256 digest with two levels of sharding so no single
//! directory grows unbounded:
//!
//! ```text
//! <root>/sha256/<h[0..2]>/<h[2..4]>/<h>
//! ```
//!
//! # Content Addressing
//!
//! - **Deduplication**: identical content maps to one file; a repeat store is a no-op
//! - **Integrity**: a blob can be verified against the digest it is named after
//! - **Immutability**: an existing blob is never rewritten
//!
//! # Write Protocol
//!
//! Content is written to a uniquely named temporary file next to its final location and then
//! renamed into place. Rename is atomic on the same filesystem, so readers never observe a
//! partially written blob and two concurrent writers of the same content both succeed.

use crate::{ContentId, ContentStore, StorageError, StoredBlob};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory under the store root holding SHA-256 addressed blobs.
const HASH_DIR_NAME: &str = "sha256";

/// Content-addressed store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_directory: PathBuf,
}

impl LocalStore {
    /// Opens a store rooted at `root_directory`, creating the directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created or canonicalised (I/O)
    pub async fn new(root_directory: &Path) -> Result<Self, StorageError> {
        match fs::metadata(root_directory).await {
            Ok(meta) if !meta.is_dir() => {
                return Err(StorageError::InvalidRootDirectory(format!(
                    "Path is not a directory: {}",
                    root_directory.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::Io(e)),
        }

        fs::create_dir_all(root_directory).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create store directory {}: {}",
                    root_directory.display(),
                    e
                ),
            ))
        })?;

        let root_directory = fs::canonicalize(root_directory).await.map_err(|e| {
            StorageError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self { root_directory })
    }

    /// Canonical root directory of this store.
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Absolute location of the blob named by `hash_hex`.
    ///
    /// Returns `None` when `hash_hex` is too short to shard (fewer than 4 bytes) or a shard
    /// boundary falls inside a multi-byte character. Every digest this store produces is 64 hex
    /// characters.
    #[must_use]
    pub fn blob_path(&self, hash_hex: &str) -> Option<PathBuf> {
        relative_path(hash_hex).map(|rel| self.root_directory.join(rel))
    }
}

/// `sha256/<shard1>/<shard2>/<hash>`
fn relative_path(hash_hex: &str) -> Option<PathBuf> {
    let shard1 = hash_hex.get(0..2)?;
    let shard2 = hash_hex.get(2..4)?;
    Some([HASH_DIR_NAME, shard1, shard2, hash_hex].iter().collect())
}

#[async_trait]
impl ContentStore for LocalStore {
    async fn store(&self, bytes: Vec<u8>) -> Result<StoredBlob, StorageError> {
        let cid = ContentId::sha256_of(&bytes)?;
        let storage_path = self.blob_path(cid.as_str()).ok_or_else(|| {
            StorageError::InvalidIdentifier(format!("Cannot shard identifier: {cid}"))
        })?;

        if fs::try_exists(&storage_path).await? {
            tracing::debug!(cid = %cid, "blob already present");
            return Ok(StoredBlob::describe(cid, &bytes));
        }

        let Some(parent) = storage_path.parent() else {
            return Err(StorageError::InvalidRootDirectory(format!(
                "Blob path has no parent: {}",
                storage_path.display()
            )));
        };

        fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create storage directory {}: {}",
                    parent.display(),
                    e
                ),
            ))
        })?;

        let temp_path = parent.join(format!(".{}.{}.tmp", cid, uuid::Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&temp_path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write file to {}: {}", temp_path.display(), e),
            )));
        }

        if let Err(e) = fs::rename(&temp_path, &storage_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to move blob into place at {}: {}",
                    storage_path.display(),
                    e
                ),
            )));
        }

        let blob = StoredBlob::describe(cid, &bytes);
        tracing::info!(
            cid = %blob.cid,
            size_bytes = blob.size_bytes,
            media_type = blob.media_type.unwrap_or("unknown"),
            "stored blob locally"
        );

        Ok(blob)
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn open_store(temp: &TempDir) -> LocalStore {
        LocalStore::new(&temp.path().join("blobs")).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("blobs");

        let store = LocalStore::new(&root).await.unwrap();

        assert!(root.is_dir());
        assert!(store.root_directory().ends_with("blobs"));
    }

    #[tokio::test]
    async fn test_new_root_not_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("file.txt");
        std::fs::write(&root, "not a directory").unwrap();

        let result = LocalStore::new(&root).await;

        assert!(matches!(result, Err(StorageError::InvalidRootDirectory(_))));
    }

    #[tokio::test]
    async fn test_new_accepts_existing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("blobs");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("keep.txt"), "existing").unwrap();

        let store = LocalStore::new(&root).await.unwrap();

        assert!(store.root_directory().join("keep.txt").is_file());
    }

    #[tokio::test]
    async fn test_store_returns_sha256_identifier() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let blob = store.store(b"Hello, World!".to_vec()).await.unwrap();

        assert_eq!(
            blob.cid.as_str(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
        assert_eq!(blob.size_bytes, 13);

        let stored = std::fs::read(store.blob_path(blob.cid.as_str()).unwrap()).unwrap();
        assert_eq!(stored, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_blob_path_sharding() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let hash = "abcdef1234567890abcdef1234567890abcdef1234567890abcdef1234567890";
        let path = store.blob_path(hash).unwrap();

        assert!(path.starts_with(store.root_directory()));
        assert!(path.ends_with(format!("sha256/ab/cd/{}", hash)));
    }

    #[tokio::test]
    async fn test_blob_path_rejects_unshardable_names() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        assert_eq!(store.blob_path(""), None);
        assert_eq!(store.blob_path("abc"), None);
        // 'é' is two bytes, so a shard boundary falls inside it
        assert_eq!(store.blob_path("aébcdef"), None);
        assert_eq!(store.blob_path("aaaébcdef"), None);
        assert!(store.blob_path("abcd").is_some());
    }

    #[tokio::test]
    async fn test_store_same_content_twice() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let first = store.store(b"Same content".to_vec()).await.unwrap();
        let second = store.store(b"Same content".to_vec()).await.unwrap();

        assert_eq!(first.cid, second.cid);

        let shard_dir = store.blob_path(first.cid.as_str()).unwrap();
        let entries = std::fs::read_dir(shard_dir.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1, "no leftover temporary files");
    }

    #[tokio::test]
    async fn test_distinct_content_distinct_identifiers() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let a = store.store(b"alpha".to_vec()).await.unwrap();
        let b = store.store(b"beta".to_vec()).await.unwrap();

        assert_ne!(a.cid, b.cid);
    }

    #[tokio::test]
    async fn test_store_empty_content() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let blob = store.store(Vec::new()).await.unwrap();

        assert_eq!(blob.size_bytes, 0);
        assert!(store.blob_path(blob.cid.as_str()).unwrap().exists());
    }

    #[tokio::test]
    async fn test_store_detects_media_type() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let blob = store.store(png_header).await.unwrap();

        assert_eq!(blob.media_type, Some("image/png"));
    }

    #[tokio::test]
    async fn test_store_binary_content() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp).await;

        let binary_data: Vec<u8> = (0..=255).collect();
        let blob = store.store(binary_data.clone()).await.unwrap();

        let stored = std::fs::read(store.blob_path(blob.cid.as_str()).unwrap()).unwrap();
        assert_eq!(stored, binary_data);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identical_writes() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(open_store(&temp).await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.store(vec![7u8; 4096]).await })
            })
            .collect();

        let mut cids = Vec::new();
        for handle in handles {
            cids.push(handle.await.unwrap().unwrap().cid);
        }

        assert!(cids.windows(2).all(|pair| pair[0] == pair[1]));
        let stored = std::fs::read(store.blob_path(cids[0].as_str()).unwrap()).unwrap();
        assert_eq!(stored, vec![7u8; 4096]);
    }
}
