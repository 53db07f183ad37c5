//! Centralized error types for godfather-mailer using thiserror.
//!
//! Every failure is terminal: it is printed once as an `[ERROR]` line and the
//! process exits with status 1. `MailerError::kind()` names the category.

use thiserror::Error;

/// Errors related to loading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Errors related to decoding the JSON notification request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
    #[error("unknown email type: {0}")]
    UnknownType(String),
    #[error("missing field '{field}' for email type '{kind}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("no recipient emails provided")]
    NoRecipients,
    #[error("invalid recipient address '{address}': {message}")]
    InvalidRecipient { address: String, message: String },
}

/// Errors related to template loading and rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template '{name}' not found")]
    NotFound { name: String },
    #[error("cannot load template '{name}': {message}")]
    LoadFailed { name: String, message: String },
    #[error("template render failed: {message}")]
    RenderFailed { message: String },
}

/// Errors related to building a mail transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to create test account: {0}")]
    TestAccount(String),
    #[error("failed to configure SMTP transport for {host}: {message}")]
    Smtp { host: String, message: String },
}

/// Errors related to building or submitting the outgoing message.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("failed to build email: {0}")]
    BuildFailed(String),
    #[error("failed to send email: {0}")]
    SendFailed(String),
}

/// Top-level error returned by a mailer run.
#[derive(Error, Debug)]
pub enum MailerError {
    #[error("usage: godfather-mailer '<json payload>'")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Send(#[from] SendError),
}

impl MailerError {
    /// Error category name, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MailerError::Usage => "UsageError",
            MailerError::Config(_) => "ConfigError",
            MailerError::Request(RequestError::UnknownType(_)) => "UnknownTypeError",
            MailerError::Request(_) => "ParseError",
            MailerError::Template(_) => "TemplateError",
            MailerError::Transport(_) => "TransportError",
            MailerError::Send(_) => "SendError",
        }
    }
}
