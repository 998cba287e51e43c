//! Error types for pool operations
use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by pools and the pool registry.
///
/// Running out of free instances is not an error: [`Pool::get`](crate::Pool::get)
/// reports exhaustion by returning `None`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An untracked instance was handed to a bounded pool that is already full
    #[error("Can't add clone to pool of '{element}', because pool is full ({capacity} instances)")]
    PoolFull {
        /// Element type of the pool
        element: &'static str,
        /// Configured capacity of the pool
        capacity: usize,
    },

    /// A tracked instance was returned while it was already free
    #[error("Passed '{element}' object is already free")]
    AlreadyFree {
        /// Element type of the pool
        element: &'static str,
    },

    /// Two registry entries share the same pool name
    #[error("Pool registry already contains pool with name \"{name}\"")]
    DuplicatePoolName {
        /// The conflicting name
        name: String,
    },

    /// Pool settings are invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
    },

    /// No registered pool matches the lookup key
    #[error("No pool registered for {key}")]
    PoolNotFound {
        /// Human-readable lookup key (index, name or element type)
        key: String,
    },

    /// A type-erased value or pool did not have the requested element type
    #[error("Type mismatch: expected '{expected}', found '{actual}'")]
    TypeMismatch {
        /// The requested type
        expected: &'static str,
        /// The type actually found
        actual: &'static str,
    },
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error was raised while validating configuration.
    ///
    /// Configuration errors are detected before any pool is built, so the
    /// caller can fix its settings and try again.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::DuplicatePoolName { .. }
        )
    }

    /// Get the pool element type associated with this error (if any)
    #[must_use]
    pub fn element(&self) -> Option<&'static str> {
        match self {
            Self::PoolFull { element, .. } | Self::AlreadyFree { element } => Some(*element),
            Self::TypeMismatch { expected, .. } => Some(*expected),
            Self::DuplicatePoolName { .. }
            | Self::Configuration { .. }
            | Self::PoolNotFound { .. } => None,
        }
    }
}
