//! Author record model.
//!
//! # Responsibility
//! - Define author write, patch and read shapes.
//! - Provide the pure field rules for `name` and `phone_number`.
//!
//! # Invariants
//! - `name` is non-empty. Uniqueness is a storage concern and is checked by
//!   the repository, not here.
//! - `phone_number` matches `^[0-9]{10}$`.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// System-generated author row id.
pub type AuthorId = i64;

/// Required phone number length, in digits.
pub const PHONE_NUMBER_LEN: usize = 10;

static PHONE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[0-9]{{{PHONE_NUMBER_LEN}}}$")).expect("valid phone number regex")
});

/// Rejects an empty author name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("name", "Author must have a name."));
    }
    Ok(())
}

/// Accepts exactly ten ASCII digits and nothing else.
pub fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if !PHONE_NUMBER_RE.is_match(phone_number) {
        return Err(ValidationError::new(
            "phone_number",
            "Phone numbers must be exactly ten digits.",
        ));
    }
    Ok(())
}

/// Error reported when another author already holds `name`.
pub fn duplicate_name_error(name: &str) -> ValidationError {
    ValidationError::new("name", format!("Author with name `{name}` already exists."))
}

/// Validated input for inserting a new author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewAuthorFields")]
pub struct NewAuthor {
    pub name: String,
    pub phone_number: String,
}

#[derive(Deserialize)]
struct NewAuthorFields {
    name: String,
    phone_number: String,
}

impl NewAuthor {
    /// Builds an author draft, rejecting the first invalid field.
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let author = Self {
            name: name.into(),
            phone_number: phone_number.into(),
        };
        author.validate()?;
        Ok(author)
    }

    /// Re-checks field rules. Fields are public, so write paths call this
    /// again instead of trusting construction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_phone_number(&self.phone_number)
    }
}

impl TryFrom<NewAuthorFields> for NewAuthor {
    type Error = ValidationError;

    fn try_from(value: NewAuthorFields) -> Result<Self, Self::Error> {
        Self::new(value.name, value.phone_number)
    }
}

/// Partial author update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl AuthorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }

    /// Validates only the fields being changed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(phone_number) = self.phone_number.as_deref() {
            validate_phone_number(phone_number)?;
        }
        Ok(())
    }
}

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub phone_number: String,
    /// Unix epoch milliseconds, set once on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every update.
    pub updated_at: i64,
}

impl Author {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_phone_number(&self.phone_number)
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Author(id={}, name={})", self.id, self.name)
    }
}
