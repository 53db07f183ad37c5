//! Top-level orchestration of a single mailer run.
//!
//! A run moves linearly through
//! `Start -> ParsedInput -> ContentBuilt -> TransportReady -> Sent`,
//! and any failure ends it. There is exactly one send attempt.
//!
//! Content is built before the transport is resolved, so a bad payload or
//! template never provisions a test account.

use crate::config::MailerConfig;
use crate::console;
use crate::error::{MailerError, SendError, TransportError};
use crate::request::NotificationRequest;
use crate::template::{RenderedEmail, TemplateEngine};
use crate::transport::{ResolvedTransport, TransportMode, preview_url, resolve_transport};
use lettre::Message;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;

pub const SENDER_NAME: &str = "The Godfather Game";
pub const SENDER_ADDRESS: &str = "noreply@godfather.game";

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub message_id: String,
    /// Recipients joined with `", "`.
    pub recipients: String,
    pub sent_count: usize,
    /// Web preview link, only when a test account captured the message.
    pub preview_url: Option<String>,
}

/// Fixed display sender for every notification.
pub fn sender() -> Result<Mailbox, SendError> {
    let address = SENDER_ADDRESS
        .parse()
        .map_err(|e| SendError::BuildFailed(format!("sender address: {}", e)))?;
    Ok(Mailbox::new(Some(SENDER_NAME.to_string()), address))
}

/// Build the outgoing envelope. All recipients share one message.
pub fn build_message(
    request: &NotificationRequest,
    email: &RenderedEmail,
) -> Result<Message, SendError> {
    let mut builder = Message::builder()
        .from(sender()?)
        .subject(email.subject.as_str())
        .message_id(None);

    for recipient in &request.recipients {
        builder = builder.to(recipient.clone());
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| SendError::BuildFailed(e.to_string()))
}

/// Submit the rendered email through a resolved transport and log the outcome.
pub async fn send(
    transport: &ResolvedTransport,
    request: &NotificationRequest,
    email: &RenderedEmail,
) -> Result<DispatchReport, SendError> {
    let message = build_message(request, email)?;
    let message_id = message
        .headers()
        .get_raw("Message-ID")
        .map(|v| v.to_string())
        .unwrap_or_default();
    let recipients = request.recipient_list();

    console::info(format!(
        "Sending \"{}\" to {} recipient(s)",
        email.subject,
        request.recipients.len()
    ));

    let reply = transport
        .transport
        .send_email(message)
        .await
        .map_err(SendError::SendFailed)?;

    tracing::info!(message_id = %message_id, reply = %reply, "Email accepted by server");
    console::success(format!("Email sent: {}", message_id));
    console::info(format!("Recipients: {}", recipients));

    let preview = match &transport.mode {
        TransportMode::TestAccount { web_url } => {
            let url = preview_url(web_url, &reply);
            match &url {
                Some(url) => console::info(format!("Preview URL: {}", url)),
                None => {
                    tracing::warn!(reply = %reply, "Test server reply carried no message id")
                }
            }
            console::info(
                "This is a test email. Configure SMTP_EMAIL and SMTP_PASSWORD to deliver real email",
            );
            url
        }
        TransportMode::Configured => None,
    };

    Ok(DispatchReport {
        message_id,
        recipients,
        sent_count: request.recipients.len(),
        preview_url: preview,
    })
}

/// Run the whole pipeline for one CLI payload.
///
/// With `dry_run`, the email is rendered and printed but no transport is
/// resolved and nothing touches the network; `Ok(None)` is returned.
pub async fn run(
    config: &MailerConfig,
    payload: Option<&str>,
    dry_run: bool,
) -> Result<Option<DispatchReport>, MailerError> {
    let payload = payload.ok_or(MailerError::Usage)?;
    let request = NotificationRequest::from_json(payload)?;
    tracing::debug!(
        email_type = request.notification.type_name(),
        recipients = request.recipients.len(),
        "Parsed request"
    );

    let templates = TemplateEngine::new(config)?;
    let email = templates.render(&request.notification)?;

    if dry_run {
        print_preview(&request, &email)?;
        return Ok(None);
    }

    let http_client = reqwest::Client::builder()
        .user_agent(concat!("godfather-mailer/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TransportError::TestAccount(e.to_string()))?;
    let transport = resolve_transport(config, &http_client).await?;

    let report = send(&transport, &request, &email).await?;
    console::success(format!(
        "{} sent to {} recipient(s)",
        request.notification.summary(),
        report.sent_count
    ));
    Ok(Some(report))
}

fn print_preview(request: &NotificationRequest, email: &RenderedEmail) -> Result<(), SendError> {
    console::info("Dry run, nothing will be sent");
    console::info(format!("From: {}", sender()?));
    console::info(format!("To: {}", request.recipient_list()));
    console::info(format!("Subject: {}", email.subject));
    println!("{}", email.html);
    Ok(())
}
