mod basic_password_policy;

pub use basic_password_policy::{BasicPasswordPolicy, DEFAULT_MIN_LENGTH};
