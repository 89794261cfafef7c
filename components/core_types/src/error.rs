//! Loader error types.
//!
//! Every failure the loader reports is a [`LoaderError`]. Callers that only
//! care about the broad category can match on [`LoaderError::kind`].

use std::fmt;
use std::sync::Arc;

/// Error type returned by unit initializers.
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// The category of a loader error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup mistake: duplicate definition, unknown root, bad config
    ConfigurationError,
    /// A dependency never finished loading within the allowed time
    StalledDependency,
    /// A unit initializer returned an error
    InitializerError,
    /// A fetched script returned an error while executing
    ScriptError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::StalledDependency => "StalledDependency",
            ErrorKind::InitializerError => "InitializerError",
            ErrorKind::ScriptError => "ScriptError",
        };
        f.write_str(name)
    }
}

/// An error raised by the unit loader.
///
/// Configuration errors are raised synchronously from the call that caused
/// them and abort it before the dependency graph is touched.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, LoaderError};
///
/// let error = LoaderError::UnknownRoot {
///     root: "app".to_string(),
///     unit: "app.views.Home".to_string(),
/// };
/// assert_eq!(error.kind(), ErrorKind::ConfigurationError);
/// assert_eq!(
///     error.to_string(),
///     "url prefix for root: app does not exist (unit app.views.Home)"
/// );
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoaderError {
    /// `define` was called with an empty unit name
    #[error("unit name cannot be empty")]
    EmptyName,

    /// A unit with this name has already finished initializing
    #[error("unit with name: {0} already exists")]
    DuplicateDefinition(String),

    /// The first segment of a dotted name has no registered base URL
    #[error("url prefix for root: {root} does not exist (unit {unit})")]
    UnknownRoot {
        /// The unregistered root segment
        root: String,
        /// The unit whose name could not be resolved
        unit: String,
    },

    /// Loader configuration could not be read or parsed
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    /// Units still waiting on dependencies when a deadline expired
    #[error("units never became ready: {}", .0.join(", "))]
    Stalled(Vec<String>),

    /// A unit initializer failed
    #[error("initializer of unit {unit} failed: {source}")]
    Initializer {
        /// The unit whose initializer failed
        unit: String,
        /// The error returned by the initializer
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A fetched script failed while executing
    #[error("script loaded from {url} failed: {message}")]
    Script {
        /// Location the script was fetched from
        url: String,
        /// Human-readable failure description
        message: String,
    },
}

impl LoaderError {
    /// Wraps an initializer failure for `unit`.
    pub fn initializer(unit: impl Into<String>, source: InitError) -> Self {
        LoaderError::Initializer {
            unit: unit.into(),
            source: Arc::from(source),
        }
    }

    /// Creates a script failure for the script fetched from `url`.
    pub fn script(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoaderError::Script {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::EmptyName
            | LoaderError::DuplicateDefinition(_)
            | LoaderError::UnknownRoot { .. }
            | LoaderError::InvalidConfig(_) => ErrorKind::ConfigurationError,
            LoaderError::Stalled(_) => ErrorKind::StalledDependency,
            LoaderError::Initializer { .. } => ErrorKind::InitializerError,
            LoaderError::Script { .. } => ErrorKind::ScriptError,
        }
    }

    /// Returns true for errors caused by loader misconfiguration.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::ConfigurationError
    }
}
