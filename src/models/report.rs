//! Report card artifact and content digest.

use std::fmt;

use serde::Serialize;

/// Raw bytes of a report card PDF as returned by the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    bytes: Vec<u8>,
}

impl ReportArtifact {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for ReportArtifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Lowercase hex SHA-256 of a report's normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = 64;

    /// Wrap a digest produced by [`crate::pipeline::digest_text`].
    pub(crate) fn from_hex(hex: String) -> Self {
        debug_assert_eq!(hex.len(), Self::HEX_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters of the digest, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_accessors() {
        let artifact = ReportArtifact::new(b"%PDF-1.4".to_vec());
        assert_eq!(artifact.len(), 8);
        assert!(!artifact.is_empty());
        assert_eq!(artifact.as_bytes(), b"%PDF-1.4");
    }

    #[test]
    fn test_digest_short_and_json() {
        let digest = ContentDigest::from_hex("ab".repeat(32));
        assert_eq!(digest.short(), "abababababab");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
    }
}
