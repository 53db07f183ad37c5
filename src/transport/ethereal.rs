//! Disposable test accounts from the Ethereal fake SMTP service.
//!
//! Messages sent through an Ethereal account are captured, never delivered,
//! and can be inspected through a web preview link.

use crate::config::SecretString;
use crate::error::TransportError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const ETHEREAL_SMTP_HOST: &str = "smtp.ethereal.email";
pub const ETHEREAL_SMTP_PORT: u16 = 587;
pub const ETHEREAL_WEB_URL: &str = "https://ethereal.email";

const REQUESTOR: &str = "godfather-mailer";

/// Trailing `[KEY=value ...]` block of an Ethereal acceptance reply.
static REPLY_PROPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]$").expect("Invalid regex"));

static REPLY_PROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z0-9]+)=(\S+)").expect("Invalid regex"));

/// Credentials and endpoints of a provisioned test mailbox.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub user: String,
    pub pass: SecretString,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Base URL of the web inbox, used to build preview links.
    pub web_url: String,
}

#[derive(Serialize)]
struct AccountRequest<'a> {
    requestor: &'a str,
    version: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    user: Option<String>,
    pass: Option<SecretString>,
    #[serde(default)]
    smtp: Option<SmtpEndpoint>,
    web: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SmtpEndpoint {
    host: Option<String>,
    port: Option<u16>,
}

/// Provision a new test account through the provisioning API at `api_url`.
///
/// # Errors
///
/// Returns `TransportError::TestAccount` on network failure, a non-2xx
/// response, an unreadable body, or a `status` other than `success`.
pub async fn create_test_account(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<TestAccount, TransportError> {
    let url = format!("{}/user", api_url);
    tracing::debug!(url = %url, "Requesting test account");

    let response = client
        .post(&url)
        .json(&AccountRequest {
            requestor: REQUESTOR,
            version: env!("CARGO_PKG_VERSION"),
        })
        .send()
        .await
        .map_err(|e| TransportError::TestAccount(e.to_string()))?
        .error_for_status()
        .map_err(|e| TransportError::TestAccount(e.to_string()))?;

    let account: AccountResponse = response
        .json()
        .await
        .map_err(|e| TransportError::TestAccount(format!("invalid response: {}", e)))?;

    if account.status != "success" {
        return Err(TransportError::TestAccount(
            account
                .error
                .unwrap_or_else(|| format!("provisioning status '{}'", account.status)),
        ));
    }

    let (user, pass) = match (account.user, account.pass) {
        (Some(user), Some(pass)) => (user, pass),
        _ => {
            return Err(TransportError::TestAccount(
                "response is missing credentials".to_string(),
            ));
        }
    };

    let smtp = account.smtp.unwrap_or(SmtpEndpoint {
        host: None,
        port: None,
    });

    Ok(TestAccount {
        user,
        pass,
        smtp_host: smtp.host.unwrap_or_else(|| ETHEREAL_SMTP_HOST.to_string()),
        smtp_port: smtp.port.unwrap_or(ETHEREAL_SMTP_PORT),
        web_url: account
            .web
            .unwrap_or_else(|| ETHEREAL_WEB_URL.to_string())
            .trim_end_matches('/')
            .to_string(),
    })
}

/// Build the web preview link from the server's acceptance reply.
///
/// Ethereal answers the end of `DATA` with e.g.
/// `250 Accepted [STATUS=new MSGID=YxY1...]`. Both `STATUS` and `MSGID`
/// must be present; any other reply yields `None`.
pub fn preview_url(web_url: &str, reply: &str) -> Option<String> {
    let props = REPLY_PROPS.captures(reply.trim())?;

    let mut status = None;
    let mut msgid = None;
    for cap in REPLY_PROP.captures_iter(&props[1]) {
        match &cap[1] {
            "STATUS" => status = Some(cap[2].to_string()),
            "MSGID" => msgid = Some(cap[2].to_string()),
            _ => {}
        }
    }

    status
        .and(msgid)
        .map(|id| format!("{}/message/{}", web_url.trim_end_matches('/'), id))
}
