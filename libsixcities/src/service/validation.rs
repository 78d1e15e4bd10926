//! Client-side input validation
//!
//! Checks run before any network call. A failed check is shown on the
//! store's error channel like a server error would be, and the caller gets
//! `InvalidInput` back.

use crate::error::{Result, SixCitiesError};
use crate::store::Store;
use crate::types::{AuthInfo, CommentInfo};

/// Shortest accepted review, in characters after trimming
pub const MIN_COMMENT_LENGTH: usize = 50;

/// Longest accepted review, in characters after trimming
pub const MAX_COMMENT_LENGTH: usize = 299;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub const PASSWORD_RULE_MESSAGE: &str = "Password should contain at least 1 letter and digit";

/// Validation service for login and review forms
#[derive(Clone)]
pub struct ValidationService {
    store: Store,
}

impl ValidationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Check login credentials, reporting the first problem found
    pub fn validate_login(&self, auth: &AuthInfo) -> Result<()> {
        self.report(check_login(auth))
    }

    /// Check a review before it's posted, reporting the first problem found
    pub fn validate_review(&self, comment: &CommentInfo) -> Result<()> {
        self.report(check_review(comment))
    }

    fn report(&self, outcome: std::result::Result<(), String>) -> Result<()> {
        outcome.map_err(|message| {
            tracing::debug!("Validation failed: {}", message);
            self.store.process_error(message.clone());
            SixCitiesError::InvalidInput(message)
        })
    }
}

/// Login rule: both fields present, password holds a lowercase letter and a digit
pub fn check_login(auth: &AuthInfo) -> std::result::Result<(), String> {
    if auth.email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    let password = auth.password();
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let has_letter = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(PASSWORD_RULE_MESSAGE.to_string());
    }
    Ok(())
}

/// Review rule: trimmed comment of 50 to 299 characters and a rating of 1 to 5
pub fn check_review(comment: &CommentInfo) -> std::result::Result<(), String> {
    let length = comment.comment.trim().chars().count();
    if length < MIN_COMMENT_LENGTH {
        return Err(format!(
            "Review must be at least {} characters (got {})",
            MIN_COMMENT_LENGTH, length
        ));
    }
    if length > MAX_COMMENT_LENGTH {
        return Err(format!(
            "Review must be at most {} characters (got {})",
            MAX_COMMENT_LENGTH, length
        ));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&comment.rating) {
        return Err(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        ));
    }
    Ok(())
}
