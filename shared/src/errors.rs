//! Shared error types for the records dashboard

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid score: {value}")]
    InvalidScore { value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Form rule violations caught before anything is submitted.
///
/// The `Display` text is what the front end shows as a blocking alert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("National ID must have exactly 8 digits (got {length})")]
    NationalIdLength { length: usize },

    #[error("National ID may only contain digits")]
    NationalIdNotNumeric,

    #[error("Name is required")]
    NameRequired,

    #[error("Age must be a number of at most 2 digits")]
    InvalidAge,

    #[error("Guardian phone must be numeric with at most 9 digits")]
    InvalidGuardianPhone,

    #[error("Unknown gender: {value}")]
    InvalidGender { value: String },

    #[error("Subject is required")]
    SubjectRequired,

    #[error("Score must be a whole number between 0 and 20")]
    ScoreOutOfRange,

    #[error("Photo is too large ({size} bytes, max {max} bytes)")]
    PhotoTooLarge { size: usize, max: usize },

    #[error("Missing data: {field}")]
    MissingField { field: &'static str },
}
