//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod pdf;

use url::Url;

use crate::error::Result;

/// Join an endpoint path onto a base URL string.
pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    Ok(Url::parse(base_url)?.join(path)?)
}
