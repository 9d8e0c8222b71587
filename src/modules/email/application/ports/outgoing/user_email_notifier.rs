#[derive(Debug, Clone, thiserror::Error)]
pub enum UserEmailNotificationError {
    #[error("Email sending failed: {0}")]
    EmailSendingFailed(String),
}

#[async_trait::async_trait]
pub trait UserEmailNotifier: Send + Sync {
    /// Sends the message that lets `email` prove ownership with
    /// `confirmation_key`.
    async fn send_confirmation_email(
        &self,
        email: &str,
        confirmation_key: &str,
    ) -> Result<(), UserEmailNotificationError>;
}
