pub mod entities;

pub use entities::{normalize_email, RefreshToken, User, UserBuilder, UserStateError};
