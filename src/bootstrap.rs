use std::sync::Arc;
use std::time::Duration;

use deadpool_redis::{Pool, Runtime};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::auth::adapter::incoming::web::HttpCookieCodec;
use crate::auth::adapter::outgoing::jwt::JwtTokenService;
use crate::auth::adapter::outgoing::security::{Argon2Hasher, BcryptHasher};
use crate::auth::adapter::outgoing::{RedisRefreshTokenRepository, UserRepositoryPostgres};
use crate::auth::application::orchestrator::user_registration::UserRegistrationOrchestrator;
use crate::auth::application::ports::outgoing::{
    CookieCodec, KeyGenerator, PasswordHasher, RefreshTokenRepository, TokenProvider,
};
use crate::auth::application::services::keys::RandomKeyGenerator;
use crate::auth::application::services::password::BasicPasswordPolicy;
use crate::auth::application::use_cases::{
    complete_profile::CompleteProfileUseCase, confirm_email::ConfirmEmailUseCase,
    create_user::CreateUserUseCase, login_user::LoginUserUseCase, logout_user::LogoutUseCase,
};
use crate::auth::application::AccountService;
use crate::config::{AppConfig, ConfigError, PasswordHashingConfig};
use crate::email::adapter::outgoing::SmtpEmailSender;
use crate::email::application::ports::outgoing::{EmailSendError, EmailSender};
use crate::email::application::services::UserEmailService;
use crate::post::adapter::outgoing::PostRepositoryPostgres;
use crate::post::application::use_cases::update_question_status::{
    IUpdateQuestionStatusUseCase, UpdateQuestionStatusUseCase,
};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(String),

    #[error("Redis pool creation failed: {0}")]
    Redis(String),

    #[error("Email transport setup failed: {0}")]
    Email(#[from] EmailSendError),

    #[error("Password hasher setup failed: {0}")]
    PasswordHasher(String),
}

/// The wired application graph handed to the HTTP layer.
#[derive(Clone)]
pub struct AccountServices {
    pub accounts: AccountService,
    pub update_question_status: Arc<dyn IUpdateQuestionStatusUseCase>,
    pub token_provider: Arc<dyn TokenProvider>,
    pub cookie_codec: Arc<HttpCookieCodec>,
}

impl AccountServices {
    #[cfg(not(tarpaulin_include))]
    pub async fn from_env() -> Result<Self, BootstrapError> {
        let config = AppConfig::from_env()?;
        Self::connect(&config).await
    }

    /// Opens the Postgres and Redis pools, then wires every use case.
    #[cfg(not(tarpaulin_include))]
    pub async fn connect(config: &AppConfig) -> Result<Self, BootstrapError> {
        let mut opt = ConnectOptions::new(config.database.url.clone());
        opt.max_connections(config.database.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| BootstrapError::Database(e.to_string()))?;
        info!(max_connections = config.database.max_connections, "Database connected");

        let redis = deadpool_redis::Config::from_url(config.redis.url.clone())
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| BootstrapError::Redis(e.to_string()))?;
        info!("Redis pool created");

        Self::assemble(config, Arc::new(db), Arc::new(redis))
    }

    /// Wires the graph over already-open connections.
    pub fn assemble(
        config: &AppConfig,
        db: Arc<DatabaseConnection>,
        redis: Arc<Pool>,
    ) -> Result<Self, BootstrapError> {
        let users = UserRepositoryPostgres::new(db.clone());
        let refresh_tokens: Arc<dyn RefreshTokenRepository> =
            Arc::new(RedisRefreshTokenRepository::new(redis));
        let password_hasher = password_hasher(&config.password_hashing)?;
        let key_generator: Arc<dyn KeyGenerator> = Arc::new(RandomKeyGenerator::new(
            config.account_policy.confirmation_key_length,
        ));
        let token_provider: Arc<dyn TokenProvider> =
            Arc::new(JwtTokenService::new(config.jwt.clone()));
        let cookie_codec = Arc::new(HttpCookieCodec::new(config.cookies.clone()));
        let codec: Arc<dyn CookieCodec> = cookie_codec.clone();

        let sender: Arc<dyn EmailSender> = Arc::new(SmtpEmailSender::from_config(&config.email)?);
        let notifier = Arc::new(UserEmailService::new(
            sender,
            config.email.confirmation_url_base.clone(),
        ));

        let registration = UserRegistrationOrchestrator::new(
            Arc::new(CreateUserUseCase::new(users.clone(), key_generator.clone())),
            notifier,
        );

        let accounts = AccountService::new(
            Arc::new(registration),
            Arc::new(ConfirmEmailUseCase::new(users.clone())),
            Arc::new(CompleteProfileUseCase::new(
                users.clone(),
                password_hasher.clone(),
                Arc::new(BasicPasswordPolicy::new(
                    config.account_policy.password_min_length,
                )),
            )),
            Arc::new(LoginUserUseCase::new(
                users,
                refresh_tokens.clone(),
                password_hasher,
                token_provider.clone(),
                key_generator,
                codec.clone(),
                config.jwt.refresh_token_lifetime(),
            )),
            Arc::new(LogoutUseCase::new(refresh_tokens, codec)),
        );

        let update_question_status: Arc<dyn IUpdateQuestionStatusUseCase> = Arc::new(
            UpdateQuestionStatusUseCase::new(PostRepositoryPostgres::new(db)),
        );

        info!(environment = %config.environment, "Account services ready");

        Ok(Self {
            accounts,
            update_question_status,
            token_provider,
            cookie_codec,
        })
    }
}

fn password_hasher(
    config: &PasswordHashingConfig,
) -> Result<Arc<dyn PasswordHasher>, BootstrapError> {
    match *config {
        PasswordHashingConfig::Argon2 {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let hasher = Argon2Hasher::with_params(memory_kib, iterations, parallelism)
                .map_err(|e| BootstrapError::PasswordHasher(e.to_string()))?;
            Ok(Arc::new(hasher))
        }
        PasswordHashingConfig::Bcrypt { cost } => Ok(Arc::new(BcryptHasher::with_cost(cost))),
    }
}
