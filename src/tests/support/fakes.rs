use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::auth::application::domain::entities::{RefreshToken, User};
use crate::auth::application::ports::outgoing::{
    HashError, KeyGenerator, PasswordHasher, RefreshTokenRepository, RefreshTokenRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::email::application::ports::outgoing::user_email_notifier::{
    UserEmailNotificationError, UserEmailNotifier,
};

// ----------------------------------------------------------------------------
// Stores
// ----------------------------------------------------------------------------

/// Users keyed by id, with the unique email, username and confirmation key
/// columns a real database would enforce.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        {
            let mut guard = repo.users.lock().unwrap();
            for user in users {
                guard.insert(user.id, user);
            }
        }
        repo
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> Result<User, UserRepositoryError> {
        let mut users = self.users.lock().unwrap();
        let email_taken = users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email);
        let username_taken = user.username.is_some()
            && users
                .values()
                .any(|existing| existing.id != user.id && existing.username == user.username);
        let key_taken = user.email_confirmation_key.is_some()
            && users.values().any(|existing| {
                existing.id != user.id
                    && existing.email_confirmation_key == user.email_confirmation_key
            });
        if email_taken || username_taken || key_taken {
            return Err(UserRepositoryError::UserAlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.get(user_id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_confirmation_key(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email_confirmation_key.as_deref() == Some(key))
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
    lookups: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token_value: &str) -> bool {
        self.tokens.lock().unwrap().contains_key(token_value)
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.contains_key(&token.token_value) {
            return Err(RefreshTokenRepositoryError::TokenAlreadyExists);
        }
        tokens.insert(token.token_value.clone(), token);
        Ok(())
    }

    async fn find_by_token_value(
        &self,
        token_value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tokens.lock().unwrap().get(token_value).cloned())
    }

    async fn delete(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().remove(&token.token_value);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Capabilities
// ----------------------------------------------------------------------------

/// Hands out the given keys in order, then repeats the last one.
pub struct SequenceKeyGenerator {
    keys: Vec<String>,
    next: AtomicUsize,
}

impl SequenceKeyGenerator {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn fixed(key: &str) -> Self {
        Self::new([key])
    }
}

impl KeyGenerator for SequenceKeyGenerator {
    fn generate(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.keys
            .get(i)
            .or_else(|| self.keys.last())
            .cloned()
            .unwrap_or_default()
    }
}

/// Cheap deterministic stand-in for a real password hash.
#[derive(Clone, Default)]
pub struct ReversingHasher;

#[async_trait]
impl PasswordHasher for ReversingHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        Ok(format!("rev${}", password.chars().rev().collect::<String>()))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        Ok(self.hash_password(password).await? == hash)
    }
}

/// Records every confirmation email and wakes waiters.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    notify: Arc<Notify>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub async fn wait_until_called(&self) {
        self.notify.notified().await;
    }
}

#[async_trait]
impl UserEmailNotifier for RecordingNotifier {
    async fn send_confirmation_email(
        &self,
        email: &str,
        confirmation_key: &str,
    ) -> Result<(), UserEmailNotificationError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), confirmation_key.to_string()));
        self.notify.notify_one();

        if self.fail {
            Err(UserEmailNotificationError::EmailSendingFailed(
                "SMTP down".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
