//! Record models for the blog store.
//!
//! # Responsibility
//! - Define write models (`New*`), partial updates (`*Patch`) and read models
//!   for authors and posts.
//! - Own the pure field-level validation rules.
//!
//! # Invariants
//! - Write model constructors reject invalid fields; repositories re-check
//!   them before writing because the fields stay public.
//! - Read models are re-validated when loaded from storage.

pub mod author;
pub mod post;
pub mod validation;
