pub mod bootstrap;
pub mod config;
pub mod modules;
pub mod shared;
pub mod telemetry;

pub use modules::auth;
pub use modules::email;
pub use modules::post;

#[cfg(test)]
mod tests;
