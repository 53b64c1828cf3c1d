// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use scraper::Html;

use crate::error::Result;
use crate::models::PortalConfig;

/// Create an asynchronous HTTP client for the portal.
///
/// The cookie store carries the session from the login post to the
/// report post.
pub fn create_async_client(config: &PortalConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .cookie_store(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}

/// Parse a response body as an HTML document.
pub fn parse_page(body: &str) -> Html {
    Html::parse_document(body)
}
