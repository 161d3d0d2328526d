//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, then applies
//! environment overrides once at startup. `AppConfig` is the root configuration
//! struct shared (read-only) by both the payslip and keepalive services.

use std::fmt;
use std::path::{Path, PathBuf};

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Landing page - the form itself rarely changes
pub const HTTP_CACHE_HOME_MAX_AGE: u32 = 300;

pub const CACHE_CONTROL_HOME: &str = formatcp!("public, max-age={}", HTTP_CACHE_HOME_MAX_AGE);

/// Submissions and API responses must never be cached
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Submission Constants
// =============================================================================

/// Default upper bound for a whole submission request body (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Filename used for the attachment on the outbound email
pub const ATTACHMENT_FILENAME: &str = "payslip.pdf";

/// MIME type of the attachment on the outbound email
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/pdf";

/// Prefix and suffix for staged upload files
pub const STAGED_FILE_PREFIX: &str = "payslip-";
pub const STAGED_FILE_SUFFIX: &str = ".pdf";

// =============================================================================
// SMTP Defaults
// =============================================================================

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const DEFAULT_SENDER_NAME: &str = "Pay Slip System";

pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Keep-alive Pinger Defaults
// =============================================================================

pub const DEFAULT_PING_URL: &str = "https://fast-api-10yx.onrender.com/";

/// 10 minutes between pings
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 600;

pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_KEEPALIVE_PORT: u16 = 8001;

pub const PING_USER_AGENT: &str = formatcp!("payslip-keepalive/{}", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Configuration file used when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "payslip=debug,keepalive=debug,tower_http=debug";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Seconds to wait for in-flight requests on shutdown
pub const GRACEFUL_SHUTDOWN_SECS: u64 = 30;

// Environment variables consulted at startup
pub const ENV_SMTP_HOST: &str = "SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_SMTP_SENDER: &str = "SMTP_SENDER";
pub const ENV_PING_URL: &str = "PING_URL";
pub const ENV_PING_INTERVAL_SECS: &str = "PING_INTERVAL_SECS";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener for the payslip service
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Outbound mail relay
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    /// Keep-alive pinger and its own listener
    #[serde(default)]
    pub pinger: PingerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Transport security for the SMTP connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (port 465)
    Tls,
    /// Unencrypted, for local relays and test servers only
    None,
}

/// SMTP relay configuration
#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "SmtpConfig::default_host")]
    pub host: String,
    #[serde(default = "SmtpConfig::default_port")]
    pub port: u16,
    /// Account used to authenticate against the relay
    pub username: Option<String>,
    pub password: Option<String>,
    /// From address. Falls back to `username` when unset.
    pub sender: Option<String>,
    #[serde(default = "SmtpConfig::default_sender_name")]
    pub sender_name: String,
    #[serde(default)]
    pub security: SmtpSecurity,
    #[serde(default = "SmtpConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            username: None,
            password: None,
            sender: None,
            sender_name: Self::default_sender_name(),
            security: SmtpSecurity::default(),
            timeout_seconds: Self::default_timeout(),
        }
    }
}

impl SmtpConfig {
    fn default_host() -> String {
        DEFAULT_SMTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_SMTP_PORT
    }

    fn default_sender_name() -> String {
        DEFAULT_SENDER_NAME.to_string()
    }

    fn default_timeout() -> u64 {
        DEFAULT_SMTP_TIMEOUT_SECS
    }

    /// Check if credentials are configured (both username and password)
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Address the confirmation is sent from
    pub fn sender_address(&self) -> Option<&str> {
        self.sender.as_deref().or(self.username.as_deref())
    }
}

// Keeps the password out of logs and panic messages
impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("sender", &self.sender)
            .field("sender_name", &self.sender_name)
            .field("security", &self.security)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Directory for staged uploads (default: the OS temp dir)
    pub staging_dir: Option<PathBuf>,
    #[serde(default = "SubmissionConfig::default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            staging_dir: None,
            max_upload_bytes: Self::default_max_upload_bytes(),
        }
    }
}

impl SubmissionConfig {
    fn default_max_upload_bytes() -> usize {
        DEFAULT_MAX_UPLOAD_BYTES
    }
}

/// Keep-alive pinger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PingerConfig {
    #[serde(default = "PingerConfig::default_url")]
    pub url: String,
    #[serde(default = "PingerConfig::default_interval")]
    pub interval_seconds: u64,
    /// Per-request timeout
    #[serde(default = "PingerConfig::default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "PingerConfig::default_port")]
    pub port: u16,
}

impl Default for PingerConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            interval_seconds: Self::default_interval(),
            timeout_seconds: Self::default_timeout(),
            host: HttpServerConfig::default_host(),
            port: Self::default_port(),
        }
    }
}

impl PingerConfig {
    fn default_url() -> String {
        DEFAULT_PING_URL.to_string()
    }

    fn default_interval() -> u64 {
        DEFAULT_PING_INTERVAL_SECS
    }

    fn default_timeout() -> u64 {
        DEFAULT_PING_TIMEOUT_SECS
    }

    fn default_port() -> u16 {
        DEFAULT_KEEPALIVE_PORT
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load an explicit config file, or `DEFAULT_CONFIG_PATH` if present,
    /// or fall back to built-in defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Apply environment overrides from the running process.
    pub fn with_process_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, then validate. Empty values count as unset.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = get(ENV_SMTP_HOST) {
            self.smtp.host = host;
        }
        if let Some(port) = get(ENV_SMTP_PORT) {
            self.smtp.port = parse_env(ENV_SMTP_PORT, &port)?;
        }
        if let Some(user) = get(ENV_SMTP_USER) {
            self.smtp.username = Some(user);
        }
        if let Some(password) = get(ENV_SMTP_PASSWORD) {
            self.smtp.password = Some(password);
        }
        if let Some(sender) = get(ENV_SMTP_SENDER) {
            self.smtp.sender = Some(sender);
        }
        if let Some(url) = get(ENV_PING_URL) {
            self.pinger.url = url;
        }
        if let Some(interval) = get(ENV_PING_INTERVAL_SECS) {
            self.pinger.interval_seconds = parse_env(ENV_PING_INTERVAL_SECS, &interval)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be non-zero".to_string()));
        }
        if self.pinger.interval_seconds == 0 {
            return Err(ConfigError::Validation(
                "pinger.interval_seconds must be non-zero".to_string(),
            ));
        }
        if self.pinger.url.trim().is_empty() {
            return Err(ConfigError::Validation("pinger.url must not be empty".to_string()));
        }
        if self.submission.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "submission.max_upload_bytes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} has an invalid value: {value:?}")))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
