pub mod jwt;
pub mod refresh_token_repository_redis;
pub mod sea_orm_entity;
pub mod security;
pub mod user_repository_postgres;

pub use refresh_token_repository_redis::RedisRefreshTokenRepository;
pub use user_repository_postgres::UserRepositoryPostgres;
