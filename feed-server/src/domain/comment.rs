use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::user::UserSummary;

const MAX_COMMENT_CHARS: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: UserSummary,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AddCommentRequest {
    pub(crate) content: String,
}

impl AddCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation {
                field: "content",
                message: "must not be empty",
            });
        }
        if content.chars().count() > MAX_COMMENT_CHARS {
            return Err(DomainError::Validation {
                field: "content",
                message: "must be at most 5000 chars",
            });
        }
        Ok(Self {
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AddCommentRequest;

    #[test]
    fn whitespace_only_comment_is_rejected() {
        let req = AddCommentRequest {
            content: "  \t \n ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn comment_content_is_trimmed() {
        let req = AddCommentRequest {
            content: "  nice post  ".to_string(),
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.content, "nice post");
    }
}
