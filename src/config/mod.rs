//! Configuration loading for godfather-mailer.
//!
//! All settings come from environment variables and are read exactly once,
//! in `main`. The resulting [`MailerConfig`] is passed by reference to the
//! transport resolver and the template engine.

mod secret;

pub use secret::SecretString;

use crate::error::ConfigError;
use std::path::PathBuf;

/// SMTP account username (the Gmail address in production).
pub const ENV_SMTP_EMAIL: &str = "SMTP_EMAIL";
/// SMTP account password or app password.
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
/// Base URL of the game web application, used for call-to-action links.
pub const ENV_FRONTEND_URL: &str = "FRONTEND_URL";
/// Provisioning API for disposable test accounts.
pub const ENV_ETHEREAL_API_URL: &str = "ETHEREAL_API_URL";
/// Optional directory of `<name>.html.j2` files overriding the embedded templates.
pub const ENV_TEMPLATE_DIR: &str = "MAILER_TEMPLATE_DIR";

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_ETHEREAL_API_URL: &str = "https://api.nodemailer.com";

/// SMTP username/password pair. Only built when both values are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Complete runtime configuration, with defaults applied at load time.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Host used when credentials are configured.
    pub smtp_server: String,
    pub smtp_port: u16,
    /// `None` unless both `SMTP_EMAIL` and `SMTP_PASSWORD` are set and non-empty.
    pub credentials: Option<SmtpCredentials>,
    /// Base web-application URL without trailing slash.
    pub frontend_url: String,
    pub ethereal_api_url: String,
    pub template_dir: Option<PathBuf>,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            credentials: None,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            ethereal_api_url: DEFAULT_ETHEREAL_API_URL.to_string(),
            template_dir: None,
        }
    }
}

impl MailerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset, so `SMTP_EMAIL=""` behaves the same
    /// as an absent variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let smtp_port = match get(ENV_SMTP_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: ENV_SMTP_PORT.to_string(),
                    message: format!("'{}': {}", raw, e),
                })?,
            None => DEFAULT_SMTP_PORT,
        };

        let credentials = match (get(ENV_SMTP_EMAIL), get(ENV_SMTP_PASSWORD)) {
            (Some(username), Some(password)) => Some(SmtpCredentials {
                username,
                password: SecretString::new(password),
            }),
            _ => None,
        };

        let frontend_url = get(ENV_FRONTEND_URL)
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let ethereal_api_url = get(ENV_ETHEREAL_API_URL)
            .unwrap_or_else(|| DEFAULT_ETHEREAL_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            smtp_server: get(ENV_SMTP_SERVER).unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port,
            credentials,
            frontend_url,
            ethereal_api_url,
            template_dir: get(ENV_TEMPLATE_DIR).map(PathBuf::from),
        })
    }
}
