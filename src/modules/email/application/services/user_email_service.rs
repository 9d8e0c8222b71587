use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::ports::outgoing::user_email_notifier::{
    UserEmailNotificationError, UserEmailNotifier,
};

const CONFIRMATION_SUBJECT: &str = "Confirm your email address";

/// Turns account events into concrete emails.
#[derive(Clone)]
pub struct UserEmailService {
    sender: Arc<dyn EmailSender>,
    confirmation_url_base: String,
}

impl fmt::Debug for UserEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEmailService")
            .field("sender", &"<dyn EmailSender>")
            .field("confirmation_url_base", &self.confirmation_url_base)
            .finish()
    }
}

impl UserEmailService {
    pub fn new(sender: Arc<dyn EmailSender>, confirmation_url_base: impl Into<String>) -> Self {
        Self {
            sender,
            confirmation_url_base: confirmation_url_base.into(),
        }
    }

    pub fn confirmation_link(&self, confirmation_key: &str) -> String {
        format!(
            "{}/{}",
            self.confirmation_url_base.trim_end_matches('/'),
            confirmation_key
        )
    }

    fn confirmation_body(&self, confirmation_key: &str) -> String {
        let link = self.confirmation_link(confirmation_key);
        format!(
            "<p>Thanks for signing up.</p>\
             <p>Please confirm your email address by opening the link below:</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>If you did not request this, you can ignore this message.</p>"
        )
    }
}

#[async_trait]
impl UserEmailNotifier for UserEmailService {
    async fn send_confirmation_email(
        &self,
        email: &str,
        confirmation_key: &str,
    ) -> Result<(), UserEmailNotificationError> {
        let body = self.confirmation_body(confirmation_key);
        self.sender
            .send_email(email, CONFIRMATION_SUBJECT, &body)
            .await
            .map_err(|e| {
                warn!(email = %email, error = %e, "Confirmation email not delivered");
                UserEmailNotificationError::EmailSendingFailed(e.to_string())
            })?;

        debug!(email = %email, "Confirmation email handed to transport");
        Ok(())
    }
}
