//! Post record model.
//!
//! # Responsibility
//! - Define post write, patch and read shapes.
//! - Provide the pure field rules for `title`, `content`, `category` and
//!   `summary`.
//!
//! # Invariants
//! - `title` contains at least one of `TITLE_HOOKS` (case-sensitive).
//! - `content` has at least `CONTENT_MIN_CHARS` characters.
//! - `summary` has at most `SUMMARY_MAX_CHARS` characters.
//! - `category` is `fiction` or `non-fiction`.
//!
//! Lengths count Unicode scalar values, not bytes.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// System-generated post row id.
pub type PostId = i64;

pub const CONTENT_MIN_CHARS: usize = 250;
pub const SUMMARY_MAX_CHARS: usize = 250;

/// A title must contain at least one of these phrases.
pub const TITLE_HOOKS: [&str; 4] = ["Won't believe", "Secret", "Top", "Guess"];

/// Closed set of post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostCategory {
    Fiction,
    NonFiction,
}

impl PostCategory {
    pub const ALL: [PostCategory; 2] = [PostCategory::Fiction, PostCategory::NonFiction];

    /// Stable string form used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::NonFiction => "non-fiction",
        }
    }
}

impl Display for PostCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostCategory {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate_category(value)
    }
}

/// Rejects titles that contain none of `TITLE_HOOKS`.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if TITLE_HOOKS.iter().any(|hook| title.contains(hook)) {
        return Ok(());
    }
    Err(ValidationError::new(
        "title",
        format!(
            "Title must contain one of the following: {}",
            TITLE_HOOKS
                .iter()
                .map(|hook| format!("\"{hook}\""))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    ))
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.chars().count() < CONTENT_MIN_CHARS {
        return Err(ValidationError::new(
            "content",
            format!("Post content must be at least {CONTENT_MIN_CHARS} characters long."),
        ));
    }
    Ok(())
}

/// Parses a category string. Matching is exact: `Fiction` is rejected.
pub fn validate_category(category: &str) -> Result<PostCategory, ValidationError> {
    PostCategory::ALL
        .into_iter()
        .find(|known| known.as_str() == category)
        .ok_or_else(|| {
            ValidationError::new(
                "category",
                "Category must be either 'fiction' or 'non-fiction'.",
            )
        })
}

pub fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    if summary.chars().count() > SUMMARY_MAX_CHARS {
        return Err(ValidationError::new(
            "summary",
            format!("Summary must be a maximum of {SUMMARY_MAX_CHARS} characters long."),
        ));
    }
    Ok(())
}

/// Validated input for inserting a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewPostFields")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub summary: String,
}

#[derive(Deserialize)]
struct NewPostFields {
    title: String,
    content: String,
    category: String,
    summary: String,
}

impl NewPost {
    /// Builds a post draft, rejecting the first invalid field.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: PostCategory,
        summary: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let post = Self {
            title: title.into(),
            content: content.into(),
            category,
            summary: summary.into(),
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_summary(&self.summary)
    }
}

impl TryFrom<NewPostFields> for NewPost {
    type Error = ValidationError;

    fn try_from(value: NewPostFields) -> Result<Self, Self::Error> {
        let category = validate_category(&value.category)?;
        Self::new(value.title, value.content, category, value.summary)
    }
}

/// Partial post update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PostCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.summary.is_none()
    }

    /// Validates only the fields being changed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = self.title.as_deref() {
            validate_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            validate_content(content)?;
        }
        if let Some(summary) = self.summary.as_deref() {
            validate_summary(summary)?;
        }
        Ok(())
    }
}

/// Persisted post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    pub summary: String,
    /// Unix epoch milliseconds, set once on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Post {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        validate_summary(&self.summary)
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Post(id={}, title={}, content={}, summary={})",
            self.id, self.title, self.content, self.summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        validate_category, validate_content, validate_summary, validate_title, PostCategory,
        CONTENT_MIN_CHARS,
    };

    #[test]
    fn title_match_is_case_sensitive() {
        assert!(validate_title("top picks").is_err());
        assert!(validate_title("Topical").is_ok());
    }

    #[test]
    fn content_counts_characters_not_bytes() {
        let wide = "é".repeat(CONTENT_MIN_CHARS - 1);
        assert!(wide.len() > CONTENT_MIN_CHARS);
        assert!(validate_content(&wide).is_err());
    }

    #[test]
    fn summary_counts_characters_not_bytes() {
        assert!(validate_summary(&"ü".repeat(250)).is_ok());
        assert!(validate_summary(&"ü".repeat(251)).is_err());
    }

    #[test]
    fn category_parses_exact_strings_only() {
        assert_eq!(validate_category("fiction").unwrap(), PostCategory::Fiction);
        assert_eq!(
            "non-fiction".parse::<PostCategory>().unwrap(),
            PostCategory::NonFiction
        );
        assert!(validate_category("Fiction").is_err());
        assert!(validate_category("nonfiction").is_err());
    }

    #[test]
    fn title_error_lists_allowed_phrases() {
        let err = validate_title("Breaking News").unwrap_err();
        assert_eq!(err.field(), "title");
        assert!(err.message().contains("\"Won't believe\""));
        assert!(err.message().contains("\"Guess\""));
    }
}
