//! Error handling
//!
//! This module provides error handling using anyhow. As an application (not
//! a library), we prioritize ease of use over complex error type
//! hierarchies.

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};

/// Result type alias for convenience throughout the application
pub type MaquetteResult<T> = Result<T>;

/// Helper for attaching common error contexts
pub trait MaquetteContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> MaquetteResult<T>;
}

impl<T, E> MaquetteContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> MaquetteResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }
}

/// Validation helper for numeric panel input: accepts only finite values.
pub fn validate_finite(value: f32, what: &str) -> MaquetteResult<()> {
    ensure!(value.is_finite(), "{} must be finite, got: {}", what, value);
    Ok(())
}

/// Validation helper for values that must be strictly positive (lengths,
/// heights, counts).
pub fn validate_positive(value: f32, what: &str) -> MaquetteResult<()> {
    validate_finite(value, what)?;
    ensure!(value > 0.0, "{} must be positive, got: {}", what, value);
    Ok(())
}
