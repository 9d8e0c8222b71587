use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GENERAL_DISCRIMINATOR: &str = "P";
pub const QUESTION_DISCRIMINATOR: &str = "Q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    Open,
    Resolved,
}

impl QuestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Open => "OPEN",
            QuestionStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionStatus {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(QuestionStatus::Open),
            "RESOLVED" => Ok(QuestionStatus::Resolved),
            _ => Err(PostError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetails {
    pub status: QuestionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostKind {
    General,
    Question(QuestionDetails),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("Post is not a question")]
    NotAQuestion,

    #[error("Unknown question status: {0}")]
    UnknownStatus(String),
}

/// A post on the board. Questions are posts whose `kind` carries a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub hit_count: i64,
    pub like_count: i64,
    pub image_ids: Vec<Uuid>,
    pub kind: PostKind,
}

impl Post {
    pub fn new_general(author_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_kind(author_id, title.into(), content.into(), PostKind::General)
    }

    /// New questions start out open.
    pub fn new_question(author_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_kind(
            author_id,
            title.into(),
            content.into(),
            PostKind::Question(QuestionDetails {
                status: QuestionStatus::Open,
            }),
        )
    }

    fn with_kind(author_id: Uuid, title: String, content: String, kind: PostKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            hit_count: 0,
            like_count: 0,
            image_ids: Vec::new(),
            kind,
        }
    }

    pub fn discriminator(&self) -> &'static str {
        match self.kind {
            PostKind::General => GENERAL_DISCRIMINATOR,
            PostKind::Question(_) => QUESTION_DISCRIMINATOR,
        }
    }

    pub fn question_status(&self) -> Option<QuestionStatus> {
        match self.kind {
            PostKind::Question(details) => Some(details.status),
            PostKind::General => None,
        }
    }

    pub fn update_question_status(&mut self, status: QuestionStatus) -> Result<(), PostError> {
        match &mut self.kind {
            PostKind::Question(details) => {
                details.status = status;
                Ok(())
            }
            PostKind::General => Err(PostError::NotAQuestion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_status_can_be_changed() {
        let mut post = Post::new_question(Uuid::new_v4(), "How?", "Details");
        assert_eq!(post.question_status(), Some(QuestionStatus::Open));
        assert_eq!(post.discriminator(), "Q");

        post.update_question_status(QuestionStatus::Resolved).unwrap();

        assert_eq!(post.question_status(), Some(QuestionStatus::Resolved));
    }

    #[test]
    fn general_post_has_no_status() {
        let mut post = Post::new_general(Uuid::new_v4(), "News", "Body");

        assert_eq!(post.discriminator(), "P");
        assert_eq!(post.question_status(), None);
        assert_eq!(
            post.update_question_status(QuestionStatus::Resolved),
            Err(PostError::NotAQuestion)
        );
        assert_eq!(post.kind, PostKind::General);
    }

    #[test]
    fn status_text_form() {
        assert_eq!(QuestionStatus::Open.as_str(), "OPEN");
        assert_eq!("resolved".parse::<QuestionStatus>(), Ok(QuestionStatus::Resolved));
        assert!(matches!(
            "CLOSED".parse::<QuestionStatus>(),
            Err(PostError::UnknownStatus(_))
        ));
        assert_eq!(
            serde_json::to_string(&QuestionStatus::Resolved).unwrap(),
            "\"RESOLVED\""
        );
    }
}
