//! IPFS-backed store
//!
//! Talks to an IPFS node (Kubo) over its HTTP RPC API. Only the `add` call is used: the blob is
//! sent as a single multipart part and the node replies with the CID it assigned. Pinning is
//! requested so the node's garbage collector keeps the blob.

use crate::{ContentId, ContentStore, StorageError, StoredBlob};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

const ADD_PATH: &str = "/api/v0/add";

/// Reply body of `/api/v0/add`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Client for an IPFS node's HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsStore {
    client: reqwest::Client,
    api_url: String,
}

impl IpfsStore {
    /// Creates a client for the node at `api_url` (for example `http://127.0.0.1:5001`).
    ///
    /// No request is made until the first store.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Same as [`IpfsStore::new`] but reuses an existing connection pool.
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_owned();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl ContentStore for IpfsStore {
    async fn store(&self, bytes: Vec<u8>) -> Result<StoredBlob, StorageError> {
        let size_bytes = bytes.len();
        let media_type = infer::get(&bytes).map(|kind| kind.mime_type());
        let form = Form::new().part("file", Part::bytes(bytes).file_name("blob"));

        let response = self
            .client
            .post(format!("{}{}", self.api_url, ADD_PATH))
            .query(&[("pin", "true")])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let reply: AddResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;
        let cid = ContentId::parse(&reply.hash)
            .map_err(|_| StorageError::InvalidResponse("empty Hash in add reply".into()))?;

        tracing::info!(
            cid = %cid,
            size_bytes,
            media_type = media_type.unwrap_or("unknown"),
            node = %self.api_url,
            "stored blob on IPFS node"
        );

        Ok(StoredBlob {
            cid,
            size_bytes: size_bytes as u64,
            media_type,
        })
    }

    fn backend(&self) -> &'static str {
        "ipfs"
    }
}
