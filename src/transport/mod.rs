//! Mail transport resolution.
//!
//! Decides between the configured SMTP account and a disposable Ethereal
//! test account, and hands back a ready-to-use [`EmailTransport`].
//!
//! # Testability
//!
//! Sending goes through the `EmailTransport` trait:
//! - Production: `SmtpTransport` wrapping `AsyncSmtpTransport<Tokio1Executor>`
//! - Testing: `MockEmailTransport` records messages without a server

pub mod ethereal;
#[cfg(test)]
pub mod mock;

use crate::config::{MailerConfig, SmtpCredentials};
use crate::console;
use crate::error::TransportError;
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

pub use ethereal::{TestAccount, create_test_account, preview_url};

/// Async email transport abstraction.
///
/// Allows injecting mock transports in tests while using the real
/// `AsyncSmtpTransport` in production.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Submit a message.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The server's acceptance reply text
    /// * `Err(String)` - Error message describing the failure
    async fn send_email(&self, message: Message) -> Result<String, String>;
}

/// Real SMTP transport wrapper implementing `EmailTransport`.
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build an authenticated transport for `host:port`.
    ///
    /// The connection starts in plain text and upgrades with STARTTLS when
    /// the server offers it.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self, TransportError> {
        let tls = TlsParameters::new(host.to_string()).map_err(|e| TransportError::Smtp {
            host: host.to_string(),
            message: format!("TLS configuration error: {}", e),
        })?;

        let inner = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .tls(Tls::Opportunistic(tls))
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self { inner })
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send_email(&self, message: Message) -> Result<String, String> {
        let response = self.inner.send(message).await.map_err(|e| e.to_string())?;
        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}

/// Which transport a configuration calls for. Pure, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportPlan {
    /// Authenticate against the configured SMTP server.
    Configured {
        host: String,
        port: u16,
        credentials: SmtpCredentials,
    },
    /// Provision a disposable test account first.
    TestAccount { api_url: String },
}

impl TransportPlan {
    /// Choose the configured server when both username and password are set.
    pub fn from_config(config: &MailerConfig) -> Self {
        match &config.credentials {
            Some(credentials) => TransportPlan::Configured {
                host: config.smtp_server.clone(),
                port: config.smtp_port,
                credentials: credentials.clone(),
            },
            None => TransportPlan::TestAccount {
                api_url: config.ethereal_api_url.clone(),
            },
        }
    }
}

/// How the resolved transport delivers mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// Real delivery through the configured server.
    Configured,
    /// Captured by a test mailbox; previews live under `web_url`.
    TestAccount { web_url: String },
}

/// A transport ready to send, plus the mode it was built in.
#[derive(Clone)]
pub struct ResolvedTransport {
    pub transport: Arc<dyn EmailTransport>,
    pub mode: TransportMode,
}

impl std::fmt::Debug for ResolvedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedTransport")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Resolve the transport for this run, provisioning a test account if needed.
///
/// # Errors
///
/// Any failure to provision the test account or configure TLS is returned
/// as a `TransportError`; nothing is retried.
pub async fn resolve_transport(
    config: &MailerConfig,
    http_client: &reqwest::Client,
) -> Result<ResolvedTransport, TransportError> {
    match TransportPlan::from_config(config) {
        TransportPlan::Configured {
            host,
            port,
            credentials,
        } => {
            console::info(format!("Using SMTP server {}:{}", host, port));
            tracing::info!(
                host = %host,
                port = port,
                username = %credentials.username,
                "Using configured SMTP credentials"
            );

            let transport = SmtpTransport::new(
                &host,
                port,
                &credentials.username,
                credentials.password.expose(),
            )?;
            Ok(ResolvedTransport {
                transport: Arc::new(transport),
                mode: TransportMode::Configured,
            })
        }
        TransportPlan::TestAccount { api_url } => {
            console::info("No SMTP credentials configured, using Ethereal test account");

            let account = create_test_account(http_client, &api_url).await?;
            tracing::info!(
                user = %account.user,
                host = %account.smtp_host,
                port = account.smtp_port,
                "Provisioned test account"
            );

            let transport = SmtpTransport::new(
                &account.smtp_host,
                account.smtp_port,
                &account.user,
                account.pass.expose(),
            )?;
            Ok(ResolvedTransport {
                transport: Arc::new(transport),
                mode: TransportMode::TestAccount {
                    web_url: account.web_url,
                },
            })
        }
    }
}
