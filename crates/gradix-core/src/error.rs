//! Typed errors for validator resolution.
//!
//! Defined here so the grader can classify resolution failures without
//! string matching.

use thiserror::Error;

/// Errors produced by the validator registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A mission declared a validator id nothing is registered under.
    #[error("unknown validator: {0}")]
    UnknownValidator(String),

    /// Two factories were registered under the same id.
    #[error("validator already registered: {0}")]
    DuplicateValidator(String),
}

impl RegistryError {
    /// Returns `true` if this is a resolution failure for an unknown id.
    pub fn is_unknown(&self) -> bool {
        matches!(self, RegistryError::UnknownValidator(_))
    }
}
