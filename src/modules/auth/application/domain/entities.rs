use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// An account. Starts with only an email address and a confirmation key,
/// becomes confirmed through the emailed key, and is completed once a
/// username and password hash are set.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub email_confirmed: bool,
    #[serde(skip_serializing)]
    pub email_confirmation_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical form used for storage and lookups.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStateError {
    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("Profile has already been completed")]
    ProfileAlreadyCompleted,
}

impl User {
    /// Fresh unconfirmed account awaiting email confirmation.
    pub fn register(email: String, confirmation_key: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username: None,
            password_hash: None,
            email_confirmed: false,
            email_confirmation_key: Some(confirmation_key),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn builder(email: impl Into<String>) -> UserBuilder {
        UserBuilder::new(email)
    }

    /// Marks the address as confirmed. The key is consumed so it cannot be
    /// replayed.
    pub fn confirm_email(&mut self) {
        self.email_confirmed = true;
        self.email_confirmation_key = None;
        self.touch();
    }

    pub fn complete_profile(
        &mut self,
        username: String,
        password_hash: String,
    ) -> Result<(), UserStateError> {
        if !self.email_confirmed {
            return Err(UserStateError::EmailNotConfirmed);
        }
        if self.password_hash.is_some() {
            return Err(UserStateError::ProfileAlreadyCompleted);
        }
        self.username = Some(username);
        self.password_hash = Some(password_hash);
        self.touch();
        Ok(())
    }

    /// Confirmed and holding a password, i.e. able to sign in.
    pub fn is_active(&self) -> bool {
        self.email_confirmed && self.password_hash.is_some()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Builds a [`User`] with every field settable. Used by fixtures and by
/// storage adapters when rehydrating rows.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    id: Uuid,
    email: String,
    username: Option<String>,
    password_hash: Option<String>,
    email_confirmed: bool,
    email_confirmation_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserBuilder {
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: None,
            password_hash: None,
            email_confirmed: false,
            email_confirmation_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = Some(hash.into());
        self
    }

    pub fn email_confirmed(mut self, confirmed: bool) -> Self {
        self.email_confirmed = confirmed;
        self
    }

    pub fn email_confirmation_key(mut self, key: impl Into<String>) -> Self {
        self.email_confirmation_key = Some(key.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            email_confirmed: self.email_confirmed,
            email_confirmation_key: self.email_confirmation_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A long-lived session credential bound to a user by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token_value: String,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn issue(token_value: String, user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token_value,
            user_id,
            issued_at: now,
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_creates_unconfirmed_user_with_key() {
        let user = User::register("test@test.com".to_string(), "key123".to_string());

        assert_eq!(user.email, "test@test.com");
        assert!(!user.email_confirmed);
        assert_eq!(user.email_confirmation_key.as_deref(), Some("key123"));
        assert!(user.username.is_none());
        assert!(user.password_hash.is_none());
        assert!(!user.is_active());
    }

    #[test]
    fn confirm_email_sets_flag_and_consumes_key() {
        let mut user = User::register("test@test.com".to_string(), "test".to_string());

        user.confirm_email();

        assert!(user.email_confirmed);
        assert!(user.email_confirmation_key.is_none());
        assert_eq!(user.email, "test@test.com");
    }

    #[test]
    fn complete_profile_requires_confirmed_email() {
        let mut user = User::register("test@test.com".to_string(), "test".to_string());

        let result = user.complete_profile("tester".to_string(), "$hash".to_string());

        assert_eq!(result, Err(UserStateError::EmailNotConfirmed));
        assert!(user.username.is_none());
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn complete_profile_on_confirmed_user_activates_account() {
        let mut user = User::builder("test@test.com")
            .email_confirmed(true)
            .build();

        user.complete_profile("tester".to_string(), "$hash".to_string())
            .unwrap();

        assert_eq!(user.username.as_deref(), Some("tester"));
        assert_eq!(user.password_hash.as_deref(), Some("$hash"));
        assert!(user.is_active());
    }

    #[test]
    fn completed_profile_cannot_be_replaced() {
        let mut user = User::builder("test@test.com")
            .email_confirmed(true)
            .username("tester")
            .password_hash("$hash")
            .build();

        let result = user.complete_profile("intruder".to_string(), "$other".to_string());

        assert_eq!(result, Err(UserStateError::ProfileAlreadyCompleted));
        assert_eq!(user.username.as_deref(), Some("tester"));
        assert_eq!(user.password_hash.as_deref(), Some("$hash"));
    }

    #[test]
    fn builder_sets_every_field() {
        let id = Uuid::new_v4();
        let user = User::builder("a@b.com")
            .id(id)
            .username("alice")
            .password_hash("$h")
            .email_confirmed(true)
            .email_confirmation_key("k")
            .build();

        assert_eq!(user.id, id);
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.password_hash.as_deref(), Some("$h"));
        assert!(user.email_confirmed);
        assert_eq!(user.email_confirmation_key.as_deref(), Some("k"));
    }

    #[test]
    fn serialized_user_hides_secrets() {
        let user = User::builder("a@b.com")
            .password_hash("$secret")
            .email_confirmation_key("key")
            .build();

        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("email_confirmation_key").is_none());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Test@Test.COM "), "test@test.com");
    }

    #[test]
    fn refresh_token_expiry() {
        let live = RefreshToken::issue("v".to_string(), Uuid::new_v4(), Duration::days(1));
        let dead = RefreshToken::issue("v".to_string(), Uuid::new_v4(), Duration::seconds(-1));

        assert!(!live.is_expired());
        assert!(dead.is_expired());
    }
}
