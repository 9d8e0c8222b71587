mod random_key_generator;

pub use random_key_generator::{RandomKeyGenerator, DEFAULT_KEY_LENGTH, MIN_KEY_LENGTH};
