// src/services/portal.rs

//! Student portal client.
//!
//! Fetching a report takes two posts on the same cookie session: the
//! credentials go to the login servlet, whose answer carries a form of
//! hidden fields; posting those fields to the report servlet returns the PDF.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Credentials, PortalConfig, ReportArtifact};
use crate::utils::{endpoint, http};

/// Anything that can hand over the current report card.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch the report. Any error means nothing was retrieved.
    async fn fetch(&self) -> Result<ReportArtifact>;
}

/// Service for downloading the report card from the student portal.
pub struct PortalClient {
    client: Client,
    login_url: Url,
    report_url: Url,
    credentials: Credentials,
}

impl PortalClient {
    /// Create a new portal client with the given configuration.
    pub fn new(config: &PortalConfig, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            login_url: endpoint(&config.base_url, &config.login_path)?,
            report_url: endpoint(&config.base_url, &config.report_path)?,
            credentials,
        })
    }

    /// Post the credentials and return the login page HTML.
    async fn login(&self) -> Result<String> {
        let response = self
            .client
            .post(self.login_url.clone())
            .form(&self.credentials.form_fields())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::fetch(self.login_url.as_str(), status.as_u16()));
        }

        log::info!("Connected to dossier etudiant");
        Ok(response.text().await?)
    }

    /// Post the hidden login fields to the report servlet.
    async fn download(&self, fields: &[(String, String)]) -> Result<ReportArtifact> {
        let response = self
            .client
            .post(self.report_url.clone())
            .form(fields)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::fetch(self.report_url.as_str(), status.as_u16()));
        }

        let bytes = response.bytes().await?;
        log::info!("Report card fetched ({} bytes)", bytes.len());
        Ok(ReportArtifact::new(bytes.to_vec()))
    }
}

#[async_trait]
impl ReportSource for PortalClient {
    async fn fetch(&self) -> Result<ReportArtifact> {
        let page = self.login().await?;
        let fields = hidden_form_fields(&page)?;
        log::debug!("Scraped {} hidden fields from login page", fields.len());
        self.download(&fields).await
    }
}

/// Collect `name → value` of every hidden input in the page's first form.
///
/// Inputs without a name are skipped; a missing value is sent empty.
pub fn hidden_form_fields(html: &str) -> Result<Vec<(String, String)>> {
    let document = http::parse_page(html);
    let form_sel = parse_selector("form")?;
    let hidden_sel = parse_selector(r#"input[type="hidden"]"#)?;

    let form = document
        .select(&form_sel)
        .next()
        .ok_or_else(|| AppError::scrape("login response has no form"))?;

    Ok(form
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or_default();
            Some((name.to_string(), value.to_string()))
        })
        .collect())
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::scrape(format!("invalid selector '{s}': {e:?}")))
}
