/// Produces unguessable opaque keys (email confirmation keys, refresh
/// token values).
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}
