use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use crate::auth::application::domain::entities::{RefreshToken, User};
use crate::auth::application::ports::outgoing::{
    CookieCodec, CookieDirective, CookieValue, HashError, InboundCookies, PasswordHasher,
    RefreshTokenRepository, RefreshTokenRepositoryError, TokenClaims, TokenError, TokenProvider,
    UserRepository, UserRepositoryError,
};
use crate::email::application::ports::outgoing::email_sender::{EmailSendError, EmailSender};
use crate::post::application::domain::entities::Post;
use crate::post::application::ports::outgoing::post_repository::{
    PostRepository, PostRepositoryError,
};

mock! {
    pub UserRepo {}
    #[async_trait]
    impl UserRepository for UserRepo {
        async fn save(&self, user: User) -> Result<User, UserRepositoryError>;
        async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;
        async fn find_by_confirmation_key(
            &self,
            key: &str,
        ) -> Result<Option<User>, UserRepositoryError>;
    }
}

mock! {
    pub RefreshTokenRepo {}
    #[async_trait]
    impl RefreshTokenRepository for RefreshTokenRepo {
        async fn save(&self, token: RefreshToken) -> Result<(), RefreshTokenRepositoryError>;
        async fn find_by_token_value(
            &self,
            token_value: &str,
        ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError>;
        async fn delete(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError>;
    }
}

mock! {
    pub Cookies {}
    impl CookieCodec for Cookies {
        fn read_cookie(&self, request: &InboundCookies, name: &str) -> Option<CookieValue>;
        fn build_session_directive(
            &self,
            name: &str,
            value: &str,
            max_age_secs: i64,
        ) -> CookieDirective;
        fn build_deletion_directive(&self, name: &str) -> CookieDirective;
    }
}

mock! {
    pub Hasher {}
    #[async_trait]
    impl PasswordHasher for Hasher {
        async fn hash_password(&self, password: &str) -> Result<String, HashError>;
        async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError>;
    }
}

mock! {
    pub Tokens {}
    impl TokenProvider for Tokens {
        fn generate_access_token(&self, user_id: Uuid) -> Result<String, TokenError>;
        fn verify_access_token(&self, token: &str) -> Result<TokenClaims, TokenError>;
    }
}

mock! {
    pub Sender {}
    #[async_trait]
    impl EmailSender for Sender {
        async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailSendError>;
    }
}

mock! {
    pub PostRepo {}
    #[async_trait]
    impl PostRepository for PostRepo {
        async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, PostRepositoryError>;
        async fn save(&self, post: Post) -> Result<Post, PostRepositoryError>;
    }
}
