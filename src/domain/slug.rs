//! Validation for URL-safe content slugs.
//!
//! Slugs reaching the public API come straight from the request path, so
//! anything outside `[a-z0-9-]` is rejected before touching persistence.

use thiserror::Error;

pub const MAX_SLUG_LEN: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug exceeds {MAX_SLUG_LEN} characters ({len})")]
    TooLong { len: usize },
    #[error("slug contains unsupported character `{ch}`")]
    InvalidCharacter { ch: char },
    #[error("slug must not start or end with a hyphen")]
    EdgeHyphen,
}

/// Check that `input` is a lowercase, hyphen-separated slug.
pub fn validate_slug(input: &str) -> Result<&str, SlugError> {
    if input.is_empty() {
        return Err(SlugError::Empty);
    }

    if input.len() > MAX_SLUG_LEN {
        return Err(SlugError::TooLong { len: input.len() });
    }

    if let Some(ch) = input
        .chars()
        .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '-'))
    {
        return Err(SlugError::InvalidCharacter { ch });
    }

    if input.starts_with('-') || input.ends_with('-') {
        return Err(SlugError::EdgeHyphen);
    }

    Ok(input)
}
