//! Structured validation failures.

use serde::Serialize;
use thiserror::Error;

/// Coarse category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownVariant,
    MissingField,
    TypeMismatch,
    ConstraintViolation,
}

/// Why an untrusted payload could not become a typed value.
///
/// `field` is a path from the payload root, e.g. `items[0].rows[1].price.text`.
/// Failures on the root value itself use `$`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown variant at {field}: {found} (expected one of: {})", .expected.join(", "))]
    UnknownVariant {
        field: String,
        /// Rendering of the offending discriminant, or "missing"
        found: String,
        expected: &'static [&'static str],
    },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Type mismatch at {field}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Constraint violated at {field}: {constraint}")]
    ConstraintViolation { field: String, constraint: String },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnknownVariant { .. } => ErrorKind::UnknownVariant,
            ValidationError::MissingField { .. } => ErrorKind::MissingField,
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
        }
    }

    /// Path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownVariant { field, .. }
            | ValidationError::MissingField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::ConstraintViolation { field, .. } => field,
        }
    }
}
