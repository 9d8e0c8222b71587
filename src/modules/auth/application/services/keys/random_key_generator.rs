use rand::{distributions::Alphanumeric, Rng};

use crate::auth::application::ports::outgoing::key_generator::KeyGenerator;

pub const DEFAULT_KEY_LENGTH: usize = 32;
/// Anything shorter is brute-forceable.
pub const MIN_KEY_LENGTH: usize = 16;

/// Alphanumeric keys drawn from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct RandomKeyGenerator {
    length: usize,
}

impl RandomKeyGenerator {
    /// Lengths below [`MIN_KEY_LENGTH`] are raised to it. Configuration
    /// rejects them before they get here.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(MIN_KEY_LENGTH),
        }
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH)
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
