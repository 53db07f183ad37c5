//! godfather-mailer - Notification emails for The Godfather: Office Mafia.

pub mod cli;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod template;
pub mod transport;

// Re-export commonly used types
pub use cli::LogFormat;
pub use config::MailerConfig;
pub use dispatch::{DispatchReport, run};
pub use error::MailerError;
pub use request::{Notification, NotificationRequest};
pub use template::{RenderedEmail, TemplateEngine};
pub use transport::{EmailTransport, ResolvedTransport, TransportMode, TransportPlan};
