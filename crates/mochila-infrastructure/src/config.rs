//! Application configuration.
//!
//! Values come from an optional TOML file (`MOCHILA_CONFIG`, default
//! `mochila.toml`), then environment variables override individual keys.

use mochila_core::error::{MochilaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "mochila.toml";
pub const DEFAULT_API_BASE_URL: &str = "https://mochila-app-backend.vercel.app";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub photos: PhotoSettings,
    pub mail: MailSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    /// Prefix applied to store-relative photo references.
    pub api_base_url: String,
    /// Allowed CORS origin. `None` allows any origin.
    pub frontend_url: Option<String>,
    /// Include internal error text in failure responses (development only).
    pub expose_error_details: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            frontend_url: None,
            expose_error_details: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub data_file: PathBuf,
    pub seed_sample_data: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_file: PathBuf::from("data/mochila.json"),
            seed_sample_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoSettings {
    pub upload_dir: PathBuf,
    pub use_s3: bool,
    pub s3: S3Settings,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            use_s3: false,
            s3: S3Settings::default(),
        }
    }
}

impl PhotoSettings {
    /// S3 is used only when enabled and fully configured.
    pub fn s3_enabled(&self) -> bool {
        if !self.use_s3 {
            return false;
        }
        if !self.s3.has_credentials() {
            tracing::warn!("S3 storage is enabled but AWS credentials or bucket are missing");
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: "mochila-app-images".to_string(),
            region: "ap-northeast-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl S3Settings {
    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.access_key_id) && present(&self.secret_access_key) && !self.bucket.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailService {
    Gmail,
    Sendgrid,
    Mailgun,
}

impl FromStr for MailService {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gmail" => Ok(Self::Gmail),
            "sendgrid" => Ok(Self::Sendgrid),
            "mailgun" => Ok(Self::Mailgun),
            other => Err(format!("unknown mail service '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub service: Option<MailService>,
    pub from: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub mailgun_user: Option<String>,
    pub mailgun_password: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    /// Implicit TLS instead of STARTTLS.
    pub smtp_secure: bool,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            service: None,
            from: None,
            user: None,
            password: None,
            sendgrid_api_key: None,
            mailgun_user: None,
            mailgun_password: None,
            smtp_host: None,
            smtp_port: 587,
            smtp_secure: false,
            smtp_user: None,
            smtp_password: None,
        }
    }
}

/// Resolved SMTP connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub implicit_tls: bool,
    pub user: String,
    pub password: String,
}

/// Which transport delivers verification mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransport {
    /// Log the message instead of sending it.
    Console,
    Smtp(SmtpSettings),
}

impl MailSettings {
    /// Sender address: explicit `from`, else the account user, else a no-reply default.
    pub fn sender(&self) -> String {
        self.from
            .clone()
            .or_else(|| self.user.clone())
            .unwrap_or_else(|| "noreply@mochila.com".to_string())
    }

    /// Picks the transport: named service first, then a custom SMTP host, then console.
    pub fn transport(&self) -> MailTransport {
        let owned = |v: &Option<String>| v.clone().unwrap_or_default();

        match self.service {
            Some(MailService::Gmail) => MailTransport::Smtp(SmtpSettings {
                host: "smtp.gmail.com".to_string(),
                port: 465,
                implicit_tls: true,
                user: owned(&self.user),
                password: owned(&self.password),
            }),
            Some(MailService::Sendgrid) => MailTransport::Smtp(SmtpSettings {
                host: "smtp.sendgrid.net".to_string(),
                port: 587,
                implicit_tls: false,
                user: "apikey".to_string(),
                password: owned(&self.sendgrid_api_key),
            }),
            Some(MailService::Mailgun) => MailTransport::Smtp(SmtpSettings {
                host: "smtp.mailgun.org".to_string(),
                port: 587,
                implicit_tls: false,
                user: owned(&self.mailgun_user),
                password: owned(&self.mailgun_password),
            }),
            None => match self.smtp_host.as_deref().filter(|h| !h.is_empty()) {
                Some(host) => MailTransport::Smtp(SmtpSettings {
                    host: host.to_string(),
                    port: self.smtp_port,
                    implicit_tls: self.smtp_secure,
                    user: owned(&self.smtp_user),
                    password: owned(&self.smtp_password),
                }),
                None => MailTransport::Console,
            },
        }
    }
}

impl AppConfig {
    /// Loads the config file (if any) and applies process environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("MOCHILA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a TOML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies environment overrides.
    ///
    /// `lookup` returns the raw value for a key; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.server.port = parse(&port, "PORT")?;
        }
        if let Some(url) = var("API_BASE_URL") {
            self.server.api_base_url = url;
        }
        if let Some(url) = var("FRONTEND_URL") {
            self.server.frontend_url = Some(url);
        }
        if let Some(env) = var("MOCHILA_ENV").or_else(|| var("NODE_ENV")) {
            self.server.expose_error_details = env.eq_ignore_ascii_case("development");
        }

        if let Some(backend) = var("MOCHILA_STORE") {
            self.store.backend = parse(&backend, "MOCHILA_STORE")?;
        }
        if let Some(path) = var("MOCHILA_DATA_FILE") {
            self.store.data_file = PathBuf::from(path);
        }
        if let Some(seed) = var("MOCHILA_SEED") {
            self.store.seed_sample_data = parse(&seed, "MOCHILA_SEED")?;
        }

        if let Some(dir) = var("UPLOAD_DIR") {
            self.photos.upload_dir = PathBuf::from(dir);
        }
        if let Some(flag) = var("USE_S3_STORAGE") {
            self.photos.use_s3 = flag.eq_ignore_ascii_case("true");
        }
        if let Some(region) = var("AWS_REGION") {
            self.photos.s3.region = region;
        }
        if let Some(bucket) = var("AWS_S3_BUCKET") {
            self.photos.s3.bucket = bucket;
        }
        if let Some(key) = var("AWS_ACCESS_KEY_ID") {
            self.photos.s3.access_key_id = Some(key);
        }
        if let Some(secret) = var("AWS_SECRET_ACCESS_KEY") {
            self.photos.s3.secret_access_key = Some(secret);
        }

        if let Some(service) = var("EMAIL_SERVICE") {
            match service.parse::<MailService>() {
                Ok(service) => self.mail.service = Some(service),
                Err(e) => tracing::warn!("Ignoring EMAIL_SERVICE: {}", e),
            }
        }
        let mail = &mut self.mail;
        for (key, slot) in [
            ("EMAIL_FROM", &mut mail.from),
            ("EMAIL_USER", &mut mail.user),
            ("EMAIL_PASSWORD", &mut mail.password),
            ("SENDGRID_API_KEY", &mut mail.sendgrid_api_key),
            ("MAILGUN_SMTP_USER", &mut mail.mailgun_user),
            ("MAILGUN_SMTP_PASSWORD", &mut mail.mailgun_password),
            ("SMTP_HOST", &mut mail.smtp_host),
            ("SMTP_USER", &mut mail.smtp_user),
            ("SMTP_PASSWORD", &mut mail.smtp_password),
        ] {
            if let Some(value) = var(key) {
                *slot = Some(value);
            }
        }
        if let Some(port) = var("SMTP_PORT") {
            mail.smtp_port = parse(&port, "SMTP_PORT")?;
        }
        if let Some(secure) = var("SMTP_SECURE") {
            mail.smtp_secure = secure.eq_ignore_ascii_case("true");
        }

        Ok(())
    }
}

fn parse<T>(raw: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| MochilaError::config(format!("Invalid {key} value '{raw}': {e}")))
}
