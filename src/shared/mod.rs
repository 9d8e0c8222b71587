pub mod errors;

pub use errors::ErrorKind;
