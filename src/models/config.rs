//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portal endpoints and HTTP behavior
    #[serde(default)]
    pub portal: PortalConfig,

    /// Portal login fields
    #[serde(default)]
    pub credentials: Credentials,

    /// Outbound mail settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Where the last seen report lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Polling interval
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay values from `DOSSIER_*` environment variables.
    ///
    /// `lookup` is usually `std::env::var(..).ok()`; unset or empty
    /// variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::USERNAME) {
            self.credentials.code = v;
        }
        if let Some(v) = get(env::PASSWORD) {
            self.credentials.nip = v;
        }
        if let Some(v) = get(env::DOB) {
            self.credentials.birth_date = v;
        }
        if let Some(v) = get(env::SENDER_EMAIL) {
            self.mail.sender = v;
        }
        if let Some(v) = get(env::TO_EMAIL) {
            self.mail.recipient = v;
        }
        if let Some(v) = get(env::EMAIL_SERVER) {
            self.mail.host = v;
        }
        if let Some(v) = get(env::EMAIL_PORT) {
            self.mail.port = v.trim().parse().map_err(|_| {
                AppError::config(format!("{} is not a valid port: {v}", env::EMAIL_PORT))
            })?;
        }
        if let Some(v) = get(env::EMAIL_USERNAME) {
            self.mail.username = v;
        }
        if let Some(v) = get(env::EMAIL_PASSWORD) {
            self.mail.password = v;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.portal.user_agent.trim().is_empty() {
            return Err(AppError::validation("portal.user_agent is empty"));
        }
        if self.portal.timeout_secs == Some(0) {
            return Err(AppError::validation("portal.timeout_secs must be > 0"));
        }
        for (name, value) in [
            ("credentials.code", &self.credentials.code),
            ("credentials.nip", &self.credentials.nip),
            ("credentials.birth_date", &self.credentials.birth_date),
            ("mail.sender", &self.mail.sender),
            ("mail.recipient", &self.mail.recipient),
            ("mail.host", &self.mail.host),
            ("mail.username", &self.mail.username),
            ("mail.password", &self.mail.password),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }
        if self.mail.port == 0 {
            return Err(AppError::validation("mail.port must be > 0"));
        }
        if self.storage.report_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.report_path is empty"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        Ok(())
    }
}

/// Environment variable names read by [`Config::apply_env`].
pub mod env {
    pub const USERNAME: &str = "DOSSIER_USERNAME";
    pub const PASSWORD: &str = "DOSSIER_PASSWORD";
    pub const DOB: &str = "DOSSIER_DOB";
    pub const SENDER_EMAIL: &str = "DOSSIER_SENDER_EMAIL";
    pub const TO_EMAIL: &str = "DOSSIER_TO_EMAIL";
    pub const EMAIL_SERVER: &str = "DOSSIER_EMAIL_SERVER";
    pub const EMAIL_PORT: &str = "DOSSIER_EMAIL_PORT";
    pub const EMAIL_USERNAME: &str = "DOSSIER_EMAIL_USERNAME";
    pub const EMAIL_PASSWORD: &str = "DOSSIER_EMAIL_PASSWORD";
}

/// Portal endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Scheme and host of the student portal
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path receiving the credentials form
    #[serde(default = "defaults::login_path")]
    pub login_path: String,

    /// Path returning the report card PDF
    #[serde(default = "defaults::report_path")]
    pub report_path: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset means the transport's own limits
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            login_path: defaults::login_path(),
            report_path: defaults::report_path(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Login fields posted to the portal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Student code
    #[serde(default)]
    pub code: String,

    /// Personal identification number
    #[serde(default)]
    pub nip: String,

    /// Date of birth, in the format the portal expects
    #[serde(default)]
    pub birth_date: String,
}

impl Credentials {
    /// Form fields in the order the login servlet expects them.
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("code", self.code.as_str()),
            ("nip", self.nip.as_str()),
            ("naissance", self.birth_date.as_str()),
        ]
    }
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub recipient: String,

    /// Mail submission host (STARTTLS)
    #[serde(default)]
    pub host: String,

    #[serde(default = "defaults::smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "defaults::subject")]
    pub subject: String,

    #[serde(default = "defaults::body")]
    pub body: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            recipient: String::new(),
            host: String::new(),
            port: defaults::smtp_port(),
            username: String::new(),
            password: String::new(),
            subject: defaults::subject(),
            body: defaults::body(),
        }
    }
}

/// Persisted report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Location of the last seen report
    #[serde(default = "defaults::stored_report")]
    pub report_path: PathBuf,

    /// Round-trip the PDF through the parser before writing it
    #[serde(default = "defaults::reserialize")]
    pub reserialize: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            report_path: defaults::stored_report(),
            reserialize: defaults::reserialize(),
        }
    }
}

/// Polling schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between two ticks
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Run the first tick immediately instead of after one interval
    #[serde(default)]
    pub run_on_start: bool,

    /// Stop after this many ticks
    #[serde(default)]
    pub max_ticks: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            run_on_start: false,
            max_ticks: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Portal defaults
    pub fn base_url() -> String {
        "https://dossieretudiant.polymtl.ca".into()
    }
    pub fn login_path() -> String {
        "/WebEtudiant7/ValidationServlet".into()
    }
    pub fn report_path() -> String {
        "/WebEtudiant7/AfficheBulletinServlet".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/87.0.4280.88 Safari/537.36"
            .into()
    }

    // Mail defaults
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn subject() -> String {
        "[POLYMTL] Changements sur le bulletin".into()
    }
    pub fn body() -> String {
        "Des changements ont été détectés dans le bulletin. \
         Vous pouvez le consulter, il est attaché dans ce courriel."
            .into()
    }

    // Storage defaults
    pub fn stored_report() -> PathBuf {
        PathBuf::from("reports/report.pdf")
    }
    pub fn reserialize() -> bool {
        true
    }

    // Schedule defaults
    pub fn interval() -> u64 {
        600
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (env::USERNAME, "1234567".to_string()),
            (env::PASSWORD, "secret".to_string()),
            (env::DOB, "000101".to_string()),
            (env::SENDER_EMAIL, "bot@example.com".to_string()),
            (env::TO_EMAIL, "me@example.com".to_string()),
            (env::EMAIL_SERVER, "smtp.example.com".to_string()),
            (env::EMAIL_PORT, "2525".to_string()),
            (env::EMAIL_USERNAME, "bot".to_string()),
            (env::EMAIL_PASSWORD, "hunter2".to_string()),
        ])
    }

    fn configured() -> Config {
        let vars = full_env();
        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).cloned()).unwrap();
        config
    }

    #[test]
    fn default_config_needs_secrets() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn env_overlay_fills_everything() {
        let config = configured();
        assert_eq!(config.credentials.code, "1234567");
        assert_eq!(config.credentials.birth_date, "000101");
        assert_eq!(config.mail.host, "smtp.example.com");
        assert_eq!(config.mail.port, 2525);
        assert_eq!(config.mail.password, "hunter2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overlay_rejects_bad_port() {
        let mut vars = full_env();
        vars.insert(env::EMAIL_PORT, "smtp".to_string());
        let mut config = Config::default();
        let err = config.apply_env(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn env_overlay_ignores_empty_values() {
        let mut config = configured();
        config.apply_env(|_| Some("   ".to_string())).unwrap();
        assert_eq!(config.credentials.code, "1234567");
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = configured();
        config.schedule.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_recipient() {
        let mut config = configured();
        config.mail.recipient = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            report_path = "/var/lib/bulletin/report.pdf"
            reserialize = false

            [schedule]
            interval_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage.report_path,
            PathBuf::from("/var/lib/bulletin/report.pdf")
        );
        assert!(!config.storage.reserialize);
        assert_eq!(config.schedule.interval_secs, 60);
        assert_eq!(config.mail.subject, "[POLYMTL] Changements sur le bulletin");
        assert_eq!(config.portal.login_path, "/WebEtudiant7/ValidationServlet");
        assert!(config.portal.timeout_secs.is_none());
    }

    #[test]
    fn credentials_form_field_names() {
        let config = configured();
        let names: Vec<_> = config
            .credentials
            .form_fields()
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(names, ["code", "nip", "naissance"]);
    }
}
