use std::sync::Arc;

use crate::auth::application::domain::entities::User;
use crate::auth::application::orchestrator::user_registration::{
    UserRegistrationError, UserRegistrationOrchestrator,
};
use crate::auth::application::ports::outgoing::{InboundCookies, OutboundCookies};
use crate::auth::application::use_cases::{
    complete_profile::{CompleteProfileError, ICompleteProfileUseCase, UserProfileDto},
    confirm_email::{ConfirmEmailError, IConfirmEmailUseCase},
    login_user::{ILoginUserUseCase, LoginError, LoginInput, LoginOutput},
    logout_user::{ILogoutUseCase, LogoutError, LogoutOutcome},
};

/// Account lifecycle entry points for the HTTP layer.
#[derive(Clone)]
pub struct AccountService {
    registration: Arc<UserRegistrationOrchestrator>,
    confirm_email: Arc<dyn IConfirmEmailUseCase>,
    complete_profile: Arc<dyn ICompleteProfileUseCase>,
    login: Arc<dyn ILoginUserUseCase>,
    logout: Arc<dyn ILogoutUseCase>,
}

impl AccountService {
    pub fn new(
        registration: Arc<UserRegistrationOrchestrator>,
        confirm_email: Arc<dyn IConfirmEmailUseCase>,
        complete_profile: Arc<dyn ICompleteProfileUseCase>,
        login: Arc<dyn ILoginUserUseCase>,
        logout: Arc<dyn ILogoutUseCase>,
    ) -> Self {
        Self {
            registration,
            confirm_email,
            complete_profile,
            login,
            logout,
        }
    }

    /// Creates an unconfirmed account and mails its confirmation key.
    pub async fn create_user_before_email_validation(
        &self,
        email: &str,
    ) -> Result<User, UserRegistrationError> {
        self.registration.register_user(email).await
    }

    pub async fn update_user_confirm(&self, confirmation_key: &str) -> Result<(), ConfirmEmailError> {
        self.confirm_email.execute(confirmation_key).await
    }

    /// Sets username and password once the address is confirmed.
    pub async fn create_user_after_email_validation(
        &self,
        dto: UserProfileDto,
    ) -> Result<User, CompleteProfileError> {
        self.complete_profile.execute(dto).await
    }

    /// Revokes the refresh token named by the request cookie, if any, and
    /// always tells the client to drop that cookie.
    pub async fn logout_process(
        &self,
        request: &InboundCookies,
        response: &mut OutboundCookies,
    ) -> Result<LogoutOutcome, LogoutError> {
        self.logout.execute(request, response).await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        response: &mut OutboundCookies,
    ) -> Result<LoginOutput, LoginError> {
        let input = LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.login.execute(input, response).await
    }
}
