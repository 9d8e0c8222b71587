use std::str::FromStr;

use tracing::info;

use crate::auth::adapter::outgoing::security::argon2_hasher::{
    DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};
use crate::auth::application::ports::outgoing::SameSitePolicy;
use crate::auth::application::services::keys::{DEFAULT_KEY_LENGTH, MIN_KEY_LENGTH};
use crate::auth::application::services::password::DEFAULT_MIN_LENGTH;

pub use crate::auth::adapter::outgoing::jwt::JwtConfig;

pub const DEFAULT_CONFIRMATION_URL_BASE: &str = "http://localhost:8080/api/auth/email-confirmation";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

fn process_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

static PROCESS: fn(&str) -> Option<String> = process_lookup;

/// Typed access to a key/value source. Production reads the process
/// environment; tests hand in a map.
pub struct Vars<'a> {
    lookup: &'a (dyn Fn(&str) -> Option<String> + 'a),
}

impl<'a> Vars<'a> {
    pub fn new(lookup: &'a (dyn Fn(&str) -> Option<String> + 'a)) -> Self {
        Self { lookup }
    }

    pub fn process() -> Vars<'static> {
        Vars { lookup: &PROCESS }
    }

    /// Blank values count as unset.
    pub fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    pub fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, format!("'{raw}': {e}"))),
            None => Ok(default),
        }
    }

    pub fn flag_or(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(key).map(|v| v.to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::invalid(key, format!("'{v}' is not a boolean"))),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Clone, PartialEq, Eq)]
pub enum SmtpTransportConfig {
    Relay {
        server: String,
        username: String,
        password: String,
    },
    /// Plain SMTP, e.g. Mailpit in test environments.
    Local { host: String, port: u16 },
}

impl std::fmt::Debug for SmtpTransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmtpTransportConfig::Relay {
                server, username, ..
            } => f
                .debug_struct("Relay")
                .field("server", server)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            SmtpTransportConfig::Local { host, port } => f
                .debug_struct("Local")
                .field("host", host)
                .field("port", port)
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub from_email: String,
    pub confirmation_url_base: String,
    pub transport: SmtpTransportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordHashingConfig {
    Argon2 {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
    Bcrypt {
        cost: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicyConfig {
    pub password_min_length: usize,
    pub confirmation_key_length: usize,
}

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub path: String,
    pub domain: Option<String>,
    pub same_site: SameSitePolicy,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub email: EmailConfig,
    pub jwt: JwtConfig,
    pub password_hashing: PasswordHashingConfig,
    pub account_policy: AccountPolicyConfig,
    pub cookies: CookieConfig,
}

impl AppConfig {
    /// Loads `.env.{RUST_ENV}` (falling back to `.env`) and then reads every
    /// section from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let env_file = format!(".env.{environment}");
        if dotenvy::from_filename(&env_file).is_err() {
            dotenvy::dotenv().ok();
        }

        let config = Self::from_vars(&Vars::process())?;
        info!(environment = %config.environment, "Configuration loaded");
        Ok(config)
    }

    pub(crate) fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let environment = vars
            .optional("RUST_ENV")
            .unwrap_or_else(|| "development".to_string());

        Ok(Self {
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
            },
            email: email_config(vars, &environment)?,
            jwt: JwtConfig::from_vars(vars)?,
            password_hashing: password_hashing_config(vars)?,
            account_policy: AccountPolicyConfig {
                password_min_length: vars.parse_or("PASSWORD_MIN_LENGTH", DEFAULT_MIN_LENGTH)?,
                confirmation_key_length: at_least(
                    vars,
                    "CONFIRMATION_KEY_LENGTH",
                    DEFAULT_KEY_LENGTH,
                    MIN_KEY_LENGTH,
                )?,
            },
            cookies: cookie_config(vars)?,
            environment,
        })
    }
}

fn at_least(
    vars: &Vars<'_>,
    key: &'static str,
    default: usize,
    min: usize,
) -> Result<usize, ConfigError> {
    let value = vars.parse_or(key, default)?;
    if value < min {
        return Err(ConfigError::invalid(key, format!("must be at least {min}")));
    }
    Ok(value)
}

fn email_config(vars: &Vars<'_>, environment: &str) -> Result<EmailConfig, ConfigError> {
    let transport = if environment == "test" {
        SmtpTransportConfig::Local {
            host: vars
                .optional("SMTP_HOST")
                .unwrap_or_else(|| "localhost".to_string()),
            port: vars.parse_or("SMTP_PORT", 1025)?,
        }
    } else {
        SmtpTransportConfig::Relay {
            server: vars.required("SMTP_SERVER")?,
            username: vars.required("SMTP_USERNAME")?,
            password: vars.required("SMTP_PASSWORD")?,
        }
    };

    Ok(EmailConfig {
        from_email: vars.required("EMAIL_FROM")?,
        confirmation_url_base: vars
            .optional("CONFIRMATION_URL_BASE")
            .unwrap_or_else(|| DEFAULT_CONFIRMATION_URL_BASE.to_string()),
        transport,
    })
}

fn password_hashing_config(vars: &Vars<'_>) -> Result<PasswordHashingConfig, ConfigError> {
    let algorithm = vars
        .optional("PASSWORD_HASHER")
        .unwrap_or_else(|| "argon2".to_string())
        .to_ascii_lowercase();

    match algorithm.as_str() {
        "argon2" => Ok(PasswordHashingConfig::Argon2 {
            memory_kib: vars.parse_or("ARGON2_MEMORY_KIB", DEFAULT_MEMORY_KIB)?,
            iterations: vars.parse_or("ARGON2_ITERATIONS", DEFAULT_ITERATIONS)?,
            parallelism: vars.parse_or("ARGON2_PARALLELISM", DEFAULT_PARALLELISM)?,
        }),
        "bcrypt" => Ok(PasswordHashingConfig::Bcrypt {
            cost: vars.parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        }),
        other => Err(ConfigError::invalid(
            "PASSWORD_HASHER",
            format!("'{other}' is not one of argon2, bcrypt"),
        )),
    }
}

fn cookie_config(vars: &Vars<'_>) -> Result<CookieConfig, ConfigError> {
    let same_site = match vars
        .optional("COOKIE_SAME_SITE")
        .map(|v| v.to_ascii_lowercase())
        .as_deref()
    {
        None | Some("lax") => SameSitePolicy::Lax,
        Some("strict") => SameSitePolicy::Strict,
        Some("none") => SameSitePolicy::None,
        Some(other) => {
            return Err(ConfigError::invalid(
                "COOKIE_SAME_SITE",
                format!("'{other}' is not one of strict, lax, none"),
            ))
        }
    };

    Ok(CookieConfig {
        secure: vars.flag_or("COOKIE_SECURE", true)?,
        path: vars
            .optional("COOKIE_PATH")
            .unwrap_or_else(|| "/".to_string()),
        domain: vars.optional("COOKIE_DOMAIN"),
        same_site,
    })
}
