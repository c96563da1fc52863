//! Mail transport adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::MailConfig;
use crate::error::{VowsError, VowsResult};

const RESEND_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<Attachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> VowsResult<()>;
}

/// Pick the transport for a mail config: Resend when an API key is set,
/// otherwise messages only go to the log.
pub fn mailer_from_config(config: &MailConfig) -> VowsResult<Arc<dyn Mailer>> {
    match config.resend_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => Ok(Arc::new(ResendMailer::new(
            key,
            &config.from,
            config.timeout(),
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

/// Sends mail through the Resend HTTP API.
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
}

#[derive(Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
}

impl ResendMailer {
    pub fn new(
        api_key: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> VowsResult<Self> {
        Self::with_base_url(api_key, from, RESEND_BASE_URL, timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        from: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> VowsResult<Self> {
        let http = crate::http::client(timeout)
            .map_err(|e| VowsError::Notification(format!("Could not build mail client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            from: from.into(),
            base_url: base_url.into(),
        })
    }

    fn request_body<'a>(&'a self, email: &'a OutboundEmail) -> ResendRequest<'a> {
        ResendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
            attachments: email
                .attachment
                .iter()
                .map(|a| ResendAttachment {
                    filename: &a.filename,
                    content: STANDARD.encode(a.content.as_bytes()),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    #[instrument(skip(self, email), fields(subject = %email.subject))]
    async fn send(&self, email: &OutboundEmail) -> VowsResult<()> {
        debug!("Sending email through Resend");

        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(email))
            .send()
            .await
            .map_err(|e| VowsError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VowsError::Notification(format!(
                "mail API returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }
}

/// Writes messages to the log instead of delivering them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> VowsResult<()> {
        info!(
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.filename.as_str()),
            "Mail delivery not configured, logging message instead"
        );
        Ok(())
    }
}
