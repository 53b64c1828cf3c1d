//! Content fingerprinting for report cards.
//!
//! The portal regenerates the PDF on every request, so two downloads of the
//! same report differ byte for byte. The fingerprint only covers the
//! extracted text after normalization.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{ContentDigest, ReportArtifact};
use crate::utils::pdf;

/// Characters dropped before hashing.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\n\r:,]").expect("static noise pattern"));

/// Strip whitespace, colons and commas, then lowercase.
pub fn normalize_text(text: &str) -> String {
    NOISE.replace_all(text, "").to_lowercase()
}

/// SHA-256 of the UTF-8 bytes of already normalized text.
pub fn digest_text(normalized: &str) -> ContentDigest {
    let hash = Sha256::digest(normalized.as_bytes());
    ContentDigest::from_hex(hex::encode(hash))
}

/// Fingerprint a report: extract, normalize, hash.
///
/// A PDF without any text yields the digest of the empty string.
pub fn fingerprint(artifact: &ReportArtifact) -> Result<ContentDigest> {
    let text = pdf::extract_text(artifact.as_bytes())?;
    Ok(digest_text(&normalize_text(&text)))
}
