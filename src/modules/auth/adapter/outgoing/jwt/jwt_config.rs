use crate::config::{ConfigError, Vars};

pub const DEFAULT_ISSUER: &str = "qna-backend";
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    pub access_token_expiry: i64,  // seconds
    pub refresh_token_expiry: i64, // seconds
}

impl JwtConfig {
    /// Reads `JWT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&Vars::process())
    }

    pub(crate) fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let secret_key = vars.required("JWT_SECRET")?;
        // HS256 wants at least 32 bytes of key material.
        if secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {MIN_SECRET_LEN} characters"),
            ));
        }

        let access_token_expiry: i64 = vars.parse_or("JWT_ACCESS_EXPIRY", 1800)?;
        if !(1..=86400).contains(&access_token_expiry) {
            return Err(ConfigError::invalid(
                "JWT_ACCESS_EXPIRY",
                "must be between 1 and 86400 seconds",
            ));
        }

        let refresh_token_expiry: i64 = vars.parse_or("JWT_REFRESH_EXPIRY", 1_209_600)?;
        if refresh_token_expiry <= access_token_expiry {
            return Err(ConfigError::invalid(
                "JWT_REFRESH_EXPIRY",
                "must be greater than JWT_ACCESS_EXPIRY",
            ));
        }

        Ok(Self {
            secret_key,
            issuer: vars
                .optional("JWT_ISSUER")
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            access_token_expiry,
            refresh_token_expiry,
        })
    }

    pub fn refresh_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_expiry)
    }
}
