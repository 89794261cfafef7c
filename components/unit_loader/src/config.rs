//! Loader configuration.
//!
//! Configuration is plain data and can be deserialized from JSON:
//!
//! ```json
//! {
//!     "roots": { "sop": "http://example.com/src/" },
//!     "suffix": ".js",
//!     "default_prefix": "http://example.com",
//!     "debug": true
//! }
//! ```

use core_types::LoaderError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Settings for a [`Loader`](crate::Loader).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Root name → base URL
    pub roots: BTreeMap<String, String>,
    /// Appended to resolved dotted names
    pub suffix: String,
    /// Prefix for relative URLs; relative URLs are left alone when unset
    pub default_prefix: Option<String>,
    /// Log every fetch as it starts and completes
    pub debug: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            roots: BTreeMap::new(),
            suffix: ".js".to_string(),
            default_prefix: None,
            debug: false,
        }
    }
}

impl LoaderConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        serde_json::from_str(json).map_err(|e| LoaderError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Adds a root binding.
    pub fn with_root(mut self, root: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.roots.insert(root.into(), base_url.into());
        self
    }

    /// Enables fetch lifecycle logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
