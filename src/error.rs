// src/error.rs

//! Unified error handling for the report watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Portal answered with something other than 200 OK
    #[error("Fetch error for {endpoint}: HTTP {status}")]
    Fetch { endpoint: String, status: u16 },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login page did not have the expected shape
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// PDF could not be parsed or its text extracted
    #[error("PDF decode error: {0}")]
    Decode(#[from] lopdf::Error),

    /// Mail submission or authentication failed
    #[error("Mail delivery error: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),

    /// Mail message could not be built
    #[error("Mail composition error: {0}")]
    Compose(String),

    /// Sender or recipient is not a valid mailbox
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a fetch error for a non-200 response.
    pub fn fetch(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Create a scrape error.
    pub fn scrape(message: impl Into<String>) -> Self {
        Self::Scrape(message.into())
    }

    /// Create a mail composition error.
    pub fn compose(message: impl fmt::Display) -> Self {
        Self::Compose(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short name of the failure class, used in tick log lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Fetch { .. } | Self::Http(_) | Self::Scrape(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Delivery(_) | Self::Compose(_) | Self::Address(_) => "delivery",
            Self::Io(_) | Self::Json(_) => "storage",
            Self::Toml(_) | Self::Url(_) | Self::Config(_) | Self::Validation(_) => "config",
        }
    }
}
