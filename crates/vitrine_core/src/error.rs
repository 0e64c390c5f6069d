//! Error types for vitrine

use thiserror::Error;

/// Errors raised while setting up site animations
///
/// Frame stepping never fails. Degenerate numeric states (empty tracks,
/// zero-length periods) are no-op frames rather than errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VitrineError {
    /// An element the feature depends on is absent from the page
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// A measured slot extent is negative or not finite
    #[error("Invalid extent {value} for slot {index}")]
    InvalidExtent { index: usize, value: f32 },

    /// A configuration value is outside its accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type for vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;
