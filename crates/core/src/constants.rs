//! Environment variable names and defaults.

pub const ENV_REST_ADDR: &str = "CV_REST_ADDR";
pub const ENV_STORAGE_BACKEND: &str = "CV_STORAGE_BACKEND";
pub const ENV_STORE_DIR: &str = "CV_STORE_DIR";
pub const ENV_IPFS_API_URL: &str = "CV_IPFS_API_URL";
pub const ENV_UPLOAD_LIMIT_BYTES: &str = "CV_UPLOAD_LIMIT_BYTES";

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STORE_DIR: &str = "blob_store";
/// Kubo's default RPC API address.
pub const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";
