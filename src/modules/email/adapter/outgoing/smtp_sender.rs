use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::{EmailConfig, SmtpTransportConfig};
use crate::email::application::ports::outgoing::email_sender::{EmailSendError, EmailSender};

/// The part of an SMTP transport the sender needs. Lets tests swap the
/// network out.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), EmailSendError>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), EmailSendError> {
        AsyncTransport::send(self, email)
            .await
            .map(|_resp| ())
            .map_err(|e| EmailSendError::Transport(e.to_string()))
    }
}

pub struct SmtpEmailSender {
    mailer: Box<dyn Mailer>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new_with_mailer(mailer: Box<dyn Mailer>, from_email: &str) -> Result<Self, EmailSendError> {
        Ok(Self {
            mailer,
            from: parse_mailbox(from_email)?,
        })
    }

    /// Authenticated TLS relay.
    pub fn new(
        smtp_server: &str,
        smtp_username: &str,
        smtp_password: &str,
        from_email: &str,
    ) -> Result<Self, EmailSendError> {
        let creds = Credentials::new(smtp_username.to_string(), smtp_password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_server)
            .map_err(|e| EmailSendError::Transport(e.to_string()))?
            .credentials(creds)
            .build();

        Self::new_with_mailer(Box::new(transport), from_email)
    }

    /// Plain, unauthenticated SMTP for Mailpit and friends.
    pub fn new_local(host: &str, port: u16, from_email: &str) -> Result<Self, EmailSendError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self::new_with_mailer(Box::new(transport), from_email)
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailSendError> {
        match &config.transport {
            SmtpTransportConfig::Relay {
                server,
                username,
                password,
            } => {
                info!(server = %server, "Using SMTP relay");
                Self::new(server, username, password, &config.from_email)
            }
            SmtpTransportConfig::Local { host, port } => {
                info!(host = %host, port = *port, "Using local SMTP");
                Self::new_local(host, *port, &config.from_email)
            }
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailSendError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| EmailSendError::InvalidAddress(format!("{address}: {e}")))
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailSendError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(to)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| EmailSendError::MessageBuild(e.to_string()))?;

        self.mailer.send(email).await
    }
}
