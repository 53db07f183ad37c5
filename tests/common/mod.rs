//! Shared helpers for integration tests: the compiled binary and a minimal
//! in-process SMTP server that answers like Ethereal.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Environment variables that must not leak from the developer's shell.
pub const MAILER_ENV_VARS: [&str; 9] = [
    "SMTP_EMAIL",
    "SMTP_PASSWORD",
    "SMTP_SERVER",
    "SMTP_PORT",
    "FRONTEND_URL",
    "ETHEREAL_API_URL",
    "MAILER_TEMPLATE_DIR",
    "LOG_FORMAT",
    "RUST_LOG",
];

pub fn mailer_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_godfather-mailer"))
}

/// A `std::process::Command` for the mailer with a clean mailer environment.
pub fn mailer_command() -> std::process::Command {
    let mut cmd = std::process::Command::new(mailer_binary());
    for var in MAILER_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Assert stderr holds exactly one line, the `[ERROR]` report, starting with `expected`.
pub fn assert_single_error_line(stderr: &[u8], expected: &str) {
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr should be one line: {:?}", stderr);
    assert!(
        lines[0].starts_with(expected),
        "expected {:?}, got {:?}",
        expected,
        lines[0]
    );
}

/// A port on 127.0.0.1 with nothing listening.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// One message received by the fake server.
#[derive(Debug, Clone, Default)]
pub struct ReceivedMail {
    pub auth: Option<String>,
    pub mail_from: String,
    pub rcpt_to: Vec<String>,
    pub data: String,
}

/// Running fake SMTP server.
pub struct FakeSmtp {
    pub port: u16,
    received: Arc<Mutex<Vec<ReceivedMail>>>,
}

impl FakeSmtp {
    /// Start listening on an ephemeral port. Accepted messages are answered
    /// with `250 Accepted [STATUS=new MSGID=<msgid>]`.
    pub async fn start(msgid: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let store = received.clone();
        let msgid = msgid.to_string();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let store = store.clone();
                let msgid = msgid.clone();
                tokio::spawn(async move {
                    let _ = session(stream, &msgid, store).await;
                });
            }
        });

        Self { port, received }
    }

    pub fn received(&self) -> Vec<ReceivedMail> {
        self.received.lock().unwrap().clone()
    }
}

async fn session(
    stream: TcpStream,
    msgid: &str,
    store: Arc<Mutex<Vec<ReceivedMail>>>,
) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);
    let mut mail = ReceivedMail::default();
    let mut line = String::new();

    write.write_all(b"220 fake.smtp ESMTP ready\r\n").await?;

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let command = line.trim_end().to_string();
        let upper = command.to_ascii_uppercase();

        let reply: String = if upper.starts_with("EHLO") {
            "250-fake.smtp\r\n250-AUTH PLAIN LOGIN\r\n250 8BITMIME\r\n".to_string()
        } else if upper.starts_with("HELO") {
            "250 fake.smtp\r\n".to_string()
        } else if upper.starts_with("AUTH") {
            mail.auth = Some(command.clone());
            "235 2.7.0 Authentication successful\r\n".to_string()
        } else if upper.starts_with("MAIL FROM") {
            mail.mail_from = command.clone();
            "250 2.1.0 OK\r\n".to_string()
        } else if upper.starts_with("RCPT TO") {
            mail.rcpt_to.push(command.clone());
            "250 2.1.5 OK\r\n".to_string()
        } else if upper == "DATA" {
            write.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await?;
            loop {
                line.clear();
                if reader.read_line(&mut line).await? == 0 {
                    return Ok(());
                }
                if line == ".\r\n" || line == ".\n" {
                    break;
                }
                mail.data.push_str(&line);
            }
            store.lock().unwrap().push(std::mem::take(&mut mail));
            format!("250 Accepted [STATUS=new MSGID={}]\r\n", msgid)
        } else if upper == "QUIT" {
            write.write_all(b"221 2.0.0 Bye\r\n").await?;
            return Ok(());
        } else if upper == "RSET" || upper == "NOOP" {
            "250 OK\r\n".to_string()
        } else {
            "502 5.5.2 Command not recognized\r\n".to_string()
        };

        write.write_all(reply.as_bytes()).await?;
    }
}
