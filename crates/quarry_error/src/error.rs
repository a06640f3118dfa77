//! Crate-level error wrapper.

use crate::{ConfigError, SourceError, ViewError};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum QuarryErrorKind {
    /// Configuration could not be loaded
    Config(ConfigError),
    /// View could not be compiled
    View(ViewError),
    /// Row source failed
    Source(SourceError),
    /// View id not present in the loaded view set
    #[from(ignore)]
    UnknownView(String),
}

impl std::fmt::Display for QuarryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuarryErrorKind::Config(e) => write!(f, "{}", e),
            QuarryErrorKind::View(e) => write!(f, "{}", e),
            QuarryErrorKind::Source(e) => write!(f, "{}", e),
            QuarryErrorKind::UnknownView(id) => write!(f, "Unknown view: {}", id),
        }
    }
}

/// Quarry error with kind discrimination.
#[derive(Debug)]
pub struct QuarryError(Box<QuarryErrorKind>);

impl QuarryError {
    /// Create a new error from a kind.
    pub fn new(kind: QuarryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuarryErrorKind {
        &self.0
    }
}

impl std::fmt::Display for QuarryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Quarry Error: {}", self.0)
    }
}

impl std::error::Error for QuarryError {}

// Generic From implementation for any type that converts to QuarryErrorKind
impl<T> From<T> for QuarryError
where
    T: Into<QuarryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quarry operations.
pub type QuarryResult<T> = std::result::Result<T, QuarryError>;
