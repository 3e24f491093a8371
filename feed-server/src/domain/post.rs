use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::user::UserSummary;

const MAX_CONTENT_CHARS: usize = 5000;
const MAX_IMAGE_URL_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// A post as the feed shows it: author summary plus engagement
/// aggregates computed for the requesting viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FeedPost {
    pub(crate) id: i64,
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author: UserSummary,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) likes_count: i64,
    pub(crate) comments_count: i64,
    pub(crate) is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            image_url: normalize_image_url(self.image_url)?,
        })
    }
}

/// Partial update: `None` means "leave the field untouched".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.content.is_none() && self.image_url.is_none() {
            return Err(DomainError::Validation {
                field: "fields",
                message: "at least one of content/image_url must be provided",
            });
        }
        let content = self
            .content
            .as_deref()
            .map(normalize_content)
            .transpose()?;
        Ok(Self {
            content,
            image_url: normalize_image_url(self.image_url)?,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        content: impl Into<String>,
        image_url: Option<String>,
        author_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let content = normalize_content(&content.into())?;
        let image_url = normalize_image_url(image_url)?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            content,
            image_url,
            author_id,
            created_at,
            updated_at,
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(DomainError::Validation {
            field: "content",
            message: "must be at most 5000 chars",
        });
    }
    Ok(content.to_string())
}

fn normalize_image_url(image_url: Option<String>) -> Result<Option<String>, DomainError> {
    match image_url {
        None => Ok(None),
        Some(url) => {
            let url = url.trim();
            if url.is_empty() || url.len() > MAX_IMAGE_URL_CHARS {
                return Err(DomainError::Validation {
                    field: "image_url",
                    message: "must be 1..500 chars",
                });
            }
            Ok(Some(url.to_string()))
        }
    }
}
