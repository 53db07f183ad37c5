//! Mock email transport for unit tests without an SMTP server.

use super::EmailTransport;
use async_trait::async_trait;
use lettre::Message;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Records every submitted message and can be told to fail.
pub struct MockEmailTransport {
    sent_messages: Mutex<Vec<SentEmail>>,
    send_count: AtomicU32,
    /// Reply returned on success.
    reply: String,
    /// If set, every send fails with this message.
    failure: Mutex<Option<String>>,
}

/// Captured email for verification.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub message_id: String,
    pub content_type: String,
}

impl MockEmailTransport {
    /// A transport that accepts everything with a plain `Ok` reply.
    pub fn new() -> Self {
        Self::with_reply("2.0.0 OK")
    }

    /// A transport that answers with an Ethereal-style acceptance reply.
    pub fn with_reply(reply: &str) -> Self {
        Self {
            sent_messages: Mutex::new(Vec::new()),
            send_count: AtomicU32::new(0),
            reply: reply.to_string(),
            failure: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, error: &str) {
        *self.failure.lock().unwrap() = Some(error.to_string());
    }

    pub fn send_count(&self) -> u32 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.sent_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for MockEmailTransport {
    async fn send_email(&self, message: Message) -> Result<String, String> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        let header = |name: &str| {
            message
                .headers()
                .get_raw(name)
                .map(|v| v.to_string())
                .unwrap_or_default()
        };

        self.sent_messages.lock().unwrap().push(SentEmail {
            from: header("From"),
            to: header("To"),
            subject: header("Subject"),
            message_id: header("Message-ID"),
            content_type: header("Content-Type"),
        });

        Ok(self.reply.clone())
    }
}
