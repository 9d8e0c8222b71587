use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::auth::application::domain::entities::User;
use crate::auth::application::use_cases::create_user::{CreateUserError, ICreateUserUseCase};
use crate::email::application::ports::outgoing::user_email_notifier::UserEmailNotifier;
use crate::shared::ErrorKind;

/// How the background confirmation mail is retried. Attempt `n` that fails
/// waits `base_delay * 2^n` before the next one.
#[derive(Debug, Clone, Copy)]
pub struct EmailRetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for EmailRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl EmailRetryPolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(attempt))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserRegistrationError {
    #[error("User creation failed: {0}")]
    CreateUserFailed(#[from] CreateUserError),
}

impl UserRegistrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserRegistrationError::CreateUserFailed(e) => e.kind(),
        }
    }
}

/// Creates the unconfirmed account, then mails the confirmation key in the
/// background. Registration never fails because of the mail.
#[derive(Clone)]
pub struct UserRegistrationOrchestrator {
    create_user_use_case: Arc<dyn ICreateUserUseCase>,
    email_notifier: Arc<dyn UserEmailNotifier>,
    retry: EmailRetryPolicy,
}

impl UserRegistrationOrchestrator {
    pub fn new(
        create_user_use_case: Arc<dyn ICreateUserUseCase>,
        email_notifier: Arc<dyn UserEmailNotifier>,
    ) -> Self {
        Self {
            create_user_use_case,
            email_notifier,
            retry: EmailRetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: EmailRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn register_user(&self, email: &str) -> Result<User, UserRegistrationError> {
        let user = self.create_user_use_case.execute(email).await?;

        match user.email_confirmation_key.clone() {
            Some(key) => self.dispatch_confirmation(user.id, user.email.clone(), key),
            None => warn!(user_id = %user.id, "Created user has no confirmation key to send"),
        }

        Ok(user)
    }

    fn dispatch_confirmation(&self, user_id: uuid::Uuid, email: String, key: String) {
        let notifier = self.email_notifier.clone();
        let retry = self.retry;

        tokio::spawn(async move {
            for attempt in 1..=retry.max_attempts {
                match notifier.send_confirmation_email(&email, &key).await {
                    Ok(()) => {
                        info!(user_id = %user_id, attempt, "Confirmation email sent");
                        return;
                    }
                    Err(e) if attempt < retry.max_attempts => {
                        warn!(
                            user_id = %user_id,
                            attempt,
                            max_attempts = retry.max_attempts,
                            error = %e,
                            "Confirmation email failed, retrying"
                        );
                        tokio::time::sleep(retry.delay_after(attempt)).await;
                    }
                    Err(e) => {
                        error!(
                            user_id = %user_id,
                            max_attempts = retry.max_attempts,
                            error = %e,
                            "Giving up on confirmation email"
                        );
                    }
                }
            }
        });
    }
}
