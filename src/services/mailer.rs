//! Outbound email for the password reset flow.
//!
//! `SmtpMailer` delivers through an SMTP relay. Outside production, a missing
//! relay falls back to `LogMailer`, which logs the recipient and the link
//! without its token.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use url::Url;

use crate::config::{AppConfig, MailConfig};

const RESET_SUBJECT: &str = "Reset your password";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid client url: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_link: &Url) -> Result<(), MailError>;
}

/// Pick the SMTP mailer when configured. Production refuses to start without
/// one; other environments fall back to the log mailer.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if config.mail.is_configured() {
        Ok(Arc::new(SmtpMailer::new(&config.mail)?))
    } else if config.is_production() {
        Err(MailError::NotConfigured("MAIL_HOST and MAIL_FROM are required in production"))
    } else {
        tracing::warn!("SMTP not configured, password reset emails will not be delivered");
        Ok(Arc::new(LogMailer))
    }
}

/// `{client_url}/reset-password?token=...`
pub fn reset_link(client_url: &str, token: &str) -> Result<Url, MailError> {
    let mut url = Url::parse(client_url)?;
    url.path_segments_mut()
        .map_err(|_| MailError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .push("reset-password");
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or(MailError::NotConfigured("MAIL_HOST"))?;
        let from: Mailbox = config
            .from_address
            .as_deref()
            .ok_or(MailError::NotConfigured("MAIL_FROM"))?
            .parse()?;

        let builder = if config.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(config.smtp_port);

        let builder = match (&config.smtp_username, &config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, reset_link: &Url) -> Result<(), MailError> {
        let to_mailbox: Mailbox = to.parse()?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(RESET_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(render_reset_text(reset_link)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(render_reset_html(reset_link)),
                    ),
            )?;

        self.transport.send(email).await?;
        tracing::info!(to = %to, "Password reset email sent");
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, reset_link: &Url) -> Result<(), MailError> {
        tracing::info!(
            to = %to,
            link = %without_query(reset_link),
            "Password reset requested (mail disabled)"
        );
        Ok(())
    }
}

/// The link with its query (and so the token) stripped
fn without_query(link: &Url) -> Url {
    let mut link = link.clone();
    link.set_query(None);
    link
}

fn render_reset_text(link: &Url) -> String {
    format!(
        "A password reset was requested for your account.\n\n\
         Open the link below within one hour to choose a new password:\n{link}\n\n\
         If you did not ask for this, you can ignore this email."
    )
}

fn render_reset_html(link: &Url) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: sans-serif;">
  <p>A password reset was requested for your account.</p>
  <p><a href="{link}">Reset your password</a></p>
  <p>The link expires in one hour. If you did not ask for this, you can ignore this email.</p>
</body>
</html>"#
    )
}
