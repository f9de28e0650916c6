use crate::StorageError;
use cv_types::NonEmptyText;
use sha2::{Digest, Sha256};

/// Opaque identifier returned by a content-addressed store.
///
/// Carevault imposes no structure beyond "non-empty": local blobs use a SHA-256 hex digest while
/// IPFS blobs use whatever CID the node reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ContentId(NonEmptyText);

impl ContentId {
    /// Wraps an identifier string produced by a backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidIdentifier`] if `input` is empty or whitespace.
    pub fn parse(input: &str) -> Result<Self, StorageError> {
        NonEmptyText::new(input)
            .map(Self)
            .map_err(|e| StorageError::InvalidIdentifier(e.to_string()))
    }

    /// Lowercase hex SHA-256 of `bytes`.
    pub(crate) fn sha256_of(bytes: &[u8]) -> Result<Self, StorageError> {
        Self::parse(&hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_cid() {
        let cid = ContentId::parse("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
        assert_eq!(cid.to_string(), "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(matches!(
            ContentId::parse("  "),
            Err(StorageError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_sha256_known_digest() {
        let cid = ContentId::sha256_of(b"Hello, World!").unwrap();
        assert_eq!(
            cid.as_str(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_serialises_transparently() {
        let cid = ContentId::parse("bafkreiabc").unwrap();
        assert_eq!(serde_json::to_string(&cid).unwrap(), "\"bafkreiabc\"");
    }
}
