pub mod entities;

pub use entities::{Post, PostError, PostKind, QuestionDetails, QuestionStatus};
