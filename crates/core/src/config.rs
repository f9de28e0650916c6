//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services that need
//! it. Request handlers never read environment variables.

use crate::constants::{
    DEFAULT_IPFS_API_URL, DEFAULT_REST_ADDR, DEFAULT_STORE_DIR, ENV_IPFS_API_URL, ENV_REST_ADDR,
    ENV_STORAGE_BACKEND, ENV_STORE_DIR, ENV_UPLOAD_LIMIT_BYTES,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which content store backs uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// SHA-256 addressed files under a local directory
    Local { store_dir: PathBuf },
    /// An IPFS node reached over its HTTP API
    Ipfs { api_url: String },
}

/// Backend selector as written in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Ipfs,
}

impl FromStr for BackendKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "ipfs" => Ok(Self::Ipfs),
            other => Err(CoreError::InvalidConfig(format!(
                "{ENV_STORAGE_BACKEND} must be 'local' or 'ipfs', got '{other}'"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: String,
    storage: StorageBackend,
    upload_limit_bytes: Option<usize>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        rest_addr: String,
        storage: StorageBackend,
        upload_limit_bytes: Option<usize>,
    ) -> CoreResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(CoreError::InvalidConfig("rest_addr cannot be empty".into()));
        }

        Ok(Self {
            rest_addr,
            storage,
            upload_limit_bytes,
        })
    }

    /// Resolve configuration from a variable lookup, typically `std::env::var(..).ok()`.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let rest_addr = get(ENV_REST_ADDR).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let kind = get(ENV_STORAGE_BACKEND)
            .map(|v| v.parse::<BackendKind>())
            .transpose()?
            .unwrap_or(BackendKind::Local);

        let storage = match kind {
            BackendKind::Local => StorageBackend::Local {
                store_dir: get(ENV_STORE_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            },
            BackendKind::Ipfs => StorageBackend::Ipfs {
                api_url: ipfs_api_url_from_env_value(get(ENV_IPFS_API_URL))?,
            },
        };

        let upload_limit_bytes = upload_limit_from_env_value(get(ENV_UPLOAD_LIMIT_BYTES))?;

        Self::new(rest_addr, storage, upload_limit_bytes)
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn storage(&self) -> &StorageBackend {
        &self.storage
    }

    /// Local store root, when the local backend is selected.
    pub fn store_dir(&self) -> Option<&Path> {
        match &self.storage {
            StorageBackend::Local { store_dir } => Some(store_dir.as_path()),
            StorageBackend::Ipfs { .. } => None,
        }
    }

    /// Request body cap for uploads. `None` means unlimited.
    pub fn upload_limit_bytes(&self) -> Option<usize> {
        self.upload_limit_bytes
    }
}

/// Parse the IPFS API URL from an optional string value.
///
/// `None` selects the default local node. Trailing slashes are stripped.
pub fn ipfs_api_url_from_env_value(value: Option<String>) -> CoreResult<String> {
    let value = value.unwrap_or_else(|| DEFAULT_IPFS_API_URL.into());
    let trimmed = value.trim().trim_end_matches('/');

    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            CoreError::InvalidConfig(format!(
                "{ENV_IPFS_API_URL} must be an http(s) URL, got '{value}'"
            ))
        })?;

    if host.is_empty() {
        return Err(CoreError::InvalidConfig(format!(
            "{ENV_IPFS_API_URL} has no host"
        )));
    }

    Ok(trimmed.to_string())
}

/// Parse the optional upload body cap.
///
/// `None` means no limit. Zero is rejected.
pub fn upload_limit_from_env_value(value: Option<String>) -> CoreResult<Option<usize>> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().parse::<usize>() {
        Ok(0) => Err(CoreError::InvalidConfig(format!(
            "{ENV_UPLOAD_LIMIT_BYTES} must be greater than zero"
        ))),
        Ok(limit) => Ok(Some(limit)),
        Err(e) => Err(CoreError::InvalidConfig(format!(
            "{ENV_UPLOAD_LIMIT_BYTES} is not a byte count: {e}"
        ))),
    }
}
