//! Error types for the locator.

use thiserror::Error;

/// Result alias used across the locator crates.
pub type LocatorResult<T> = Result<T, LocatorError>;

/// Everything that can go wrong while locating a proxy certificate.
///
/// Most of these never reach the caller of `Locator::fetch`: they are logged
/// and folded into a "no certificate" answer. Only [`LocatorError::Halted`]
/// escapes a fetch.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// A path did not fit the fixed path bound.
    #[error("path of {len} bytes exceeds the {max} byte limit")]
    PathTooLong { len: usize, max: usize },

    /// The target's environment record could not be read.
    #[error("environment unreadable: {0}")]
    EnvironUnreadable(String),

    /// Invalid locator options.
    #[error("configuration error: {0}")]
    Config(String),

    /// A restore step failed earlier; this locator no longer serves requests.
    #[error("locator halted after an unrecoverable restore failure")]
    Halted,
}

impl LocatorError {
    /// Whether this error may be answered with "no certificate" and the
    /// caller may continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LocatorError::Halted)
    }
}
