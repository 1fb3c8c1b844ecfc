//! SMTP mail channel backed by `lettre`.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::{ResolvedSmtp, TransportSecurity};
use crate::errors::OutreachError;
use crate::outreach::dispatch::{MailChannel, OutboundMessage};

/// SMTP-backed [`MailChannel`].
#[derive(Debug)]
pub struct SmtpChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpChannel {
    /// Build a channel from fully resolved SMTP settings.
    pub fn new(settings: &ResolvedSmtp) -> Result<Self, OutreachError> {
        let from: Mailbox = settings.from.parse().map_err(|e| OutreachError::BuildFailed {
            recipient: settings.from.clone(),
            detail: format!("invalid sender address: {}", e),
        })?;

        let builder = match settings.security {
            TransportSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            }
            TransportSecurity::ImplicitTls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            }
            TransportSecurity::None => Ok(
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            ),
        }
        .map_err(|e| OutreachError::ChannelAuth(format!("SMTP transport setup failed: {}", e)))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        info!(host = %settings.host, port = settings.port, security = ?settings.security,
              "initialized SMTP channel");
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailChannel for SmtpChannel {
    async fn establish(&self) -> Result<(), OutreachError> {
        debug!("verifying SMTP connection");
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(OutreachError::ChannelAuth(
                "SMTP server rejected the connection".into(),
            )),
            Err(e) => Err(OutreachError::ChannelAuth(e.to_string())),
        }
    }

    async fn submit(&self, message: &OutboundMessage) -> Result<(), OutreachError> {
        let to: Mailbox = message.recipient.parse().map_err(|e| OutreachError::BuildFailed {
            recipient: message.recipient.clone(),
            detail: format!("invalid recipient address: {}", e),
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| OutreachError::BuildFailed {
                recipient: message.recipient.clone(),
                detail: format!("failed to build message: {}", e),
            })?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| OutreachError::SendFailed {
                recipient: message.recipient.clone(),
                detail: e.to_string(),
            })
    }
}
