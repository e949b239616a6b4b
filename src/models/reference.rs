//! Identity references owned by the surrounding application.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct UserRef {
    #[validate(length(min = 1, max = 255))]
    pub id: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// An answer together with the id of the user who wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerRef {
    #[validate(length(min = 1, max = 255))]
    pub id: String,
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
}

impl AnswerRef {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
        }
    }

    pub fn owner(&self) -> UserRef {
        UserRef::new(self.user_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentRef {
    #[validate(length(min = 1, max = 255))]
    pub id: String,
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1, max = 255))]
    pub answer_id: String,
}

impl CommentRef {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        answer_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            answer_id: answer_id.into(),
        }
    }

    pub fn author(&self) -> UserRef {
        UserRef::new(self.user_id.clone())
    }
}

/// 触发通知的事件来源，存储为 `target_type` + `target_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    Comment { id: String },
}

impl EventSource {
    pub fn comment(id: impl Into<String>) -> Self {
        EventSource::Comment { id: id.into() }
    }

    pub fn target_type(&self) -> &'static str {
        match self {
            EventSource::Comment { .. } => "Comment",
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            EventSource::Comment { id } => id,
        }
    }

    /// Rebuilds a source from its stored tag; unknown tags yield `None`.
    pub fn from_parts(target_type: &str, target_id: &str) -> Option<Self> {
        match target_type {
            "Comment" => Some(EventSource::comment(target_id)),
            _ => None,
        }
    }
}

impl From<&CommentRef> for EventSource {
    fn from(comment: &CommentRef) -> Self {
        EventSource::comment(comment.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_source_tag_round_trip() {
        let source = EventSource::comment("c1");
        assert_eq!(source.target_type(), "Comment");
        assert_eq!(source.target_id(), "c1");
        assert_eq!(
            EventSource::from_parts(source.target_type(), source.target_id()),
            Some(source)
        );
        assert_eq!(EventSource::from_parts("Answer", "a1"), None);
    }

    #[test]
    fn test_reference_validation() {
        assert!(UserRef::new("u1").validate().is_ok());
        assert!(UserRef::new("").validate().is_err());
        assert!(AnswerRef::new("a1", "").validate().is_err());
        assert!(CommentRef::new("c1", "u1", "a1").validate().is_ok());
    }
}
