//! Password holder for SMTP accounts.

use serde::Deserialize;

/// An SMTP or test-account password.
///
/// Formats as `[REDACTED]` so a `MailerConfig` or `TestAccount` can be
/// traced without leaking it. Read the value with [`SecretString::expose`].
///
/// ```
/// use godfather_mailer::config::SecretString;
///
/// let pass = SecretString::new("omerta".to_string());
/// assert_eq!(format!("{:?}", pass), "[REDACTED]");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The raw password, for the SMTP `Credentials` only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
