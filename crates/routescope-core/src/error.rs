//! Core error types for routescope.
//!
//! [`RoutescopeError`] covers configuration problems, malformed route
//! manifests, serialization failures and I/O. Route resolution itself never
//! fails: unresolvable routes and views are reported as ordinary table
//! content, so nothing in here describes them.

use std::fmt;

use thiserror::Error;

/// The primary error type for routescope.
///
/// Each variant maps to a process exit status via [`RoutescopeError::exit_code`].
#[derive(Error, Debug)]
pub enum RoutescopeError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The tool is improperly configured (e.g. a required argument is missing).
    #[error("{0}")]
    ImproperlyConfigured(String),

    /// One or more requested output columns do not exist.
    #[error(
        "You provided invalid formats {}. Available formats are {}",
        QuotedList(.invalid),
        QuotedList(.available)
    )]
    InvalidColumns {
        /// The column names that were rejected, in the order given.
        invalid: Vec<String>,
        /// Every column name the table knows about.
        available: Vec<String>,
    },

    // ── Route manifest ───────────────────────────────────────────────

    /// The route manifest could not be turned into a registry.
    #[error("Manifest error: {0}")]
    ManifestError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RoutescopeError {
    /// Returns the process exit status associated with this error.
    ///
    /// - `ConfigurationError`, `ImproperlyConfigured`, `InvalidColumns` -> 2
    /// - Everything else -> 1
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::InvalidColumns { .. } => 2,
            Self::ManifestError(_) | Self::SerializationError(_) | Self::IoError(_) => 1,
        }
    }
}

/// A convenience type alias for `Result<T, RoutescopeError>`.
pub type RoutescopeResult<T> = Result<T, RoutescopeError>;

/// Renders `['a', 'b']`.
struct QuotedList<'a>(&'a [String]);

impl fmt::Display for QuotedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{item}'")?;
        }
        write!(f, "]")
    }
}
