use crate::auth::application::ports::incoming::password_policy::{
    PasswordPolicy, PasswordPolicyError,
};

pub const DEFAULT_MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 128;

#[derive(Debug, Clone)]
pub struct BasicPasswordPolicy {
    min_length: usize,
}

impl BasicPasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length.clamp(1, MAX_LENGTH),
        }
    }
}

impl Default for BasicPasswordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LENGTH)
    }
}

impl PasswordPolicy for BasicPasswordPolicy {
    fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }

        let len = password.chars().count();
        if len < self.min_length {
            return Err(PasswordPolicyError::TooShort(self.min_length));
        }

        if len > MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong(MAX_LENGTH));
        }

        Ok(())
    }
}
