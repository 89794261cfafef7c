//! Dependency name → fetch URL resolution.

use crate::config::LoaderConfig;
use core_types::LoaderError;
use std::collections::HashMap;

/// Where a dependency is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Fetch URL
    pub url: String,
    /// True if the dependency was written as a literal URL
    pub direct: bool,
}

/// Returns true if `dependency` is a literal URL rather than a dotted name.
pub fn is_direct_url(dependency: &str) -> bool {
    dependency.contains('/')
}

/// Maps dotted unit names to URLs using per-root base URLs.
///
/// `sop.ui.Overlay` with root `sop` bound to `http://example.com/src/`
/// resolves to `http://example.com/src/ui/Overlay.js`.
///
/// # Examples
///
/// ```
/// use unit_loader::NameResolver;
///
/// let mut resolver = NameResolver::new();
/// resolver.set_root_base_url("sop", "http://example.com/src");
///
/// assert_eq!(
///     resolver.resolve("sop.ui.Overlay").unwrap(),
///     "http://example.com/src/ui/Overlay.js"
/// );
/// assert!(resolver.resolve("app.Main").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NameResolver {
    roots: HashMap<String, String>,
    suffix: String,
    default_prefix: Option<String>,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::from_config(&LoaderConfig::default())
    }
}

impl NameResolver {
    /// Creates a resolver with no roots and the `.js` suffix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver from loader configuration.
    pub fn from_config(config: &LoaderConfig) -> Self {
        let mut resolver = Self {
            roots: HashMap::new(),
            suffix: config.suffix.clone(),
            default_prefix: config.default_prefix.clone(),
        };
        for (root, base_url) in &config.roots {
            resolver.set_root_base_url(root, base_url);
        }
        resolver
    }

    /// Binds `root` to `base_url`, adding a trailing `/` when missing.
    /// Rebinding a root overwrites the previous base.
    pub fn set_root_base_url(&mut self, root: &str, base_url: &str) {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.roots.insert(root.to_string(), base_url);
    }

    /// The base URL bound to `root`.
    pub fn base_url(&self, root: &str) -> Option<&str> {
        self.roots.get(root).map(String::as_str)
    }

    /// Resolves a dotted name.
    ///
    /// # Arguments
    ///
    /// * `name` - Dotted unit name; its first segment selects the root
    ///
    /// # Returns
    ///
    /// The root's base URL, followed by the remaining segments joined with
    /// `/` and the suffix, or [`LoaderError::UnknownRoot`] when the root
    /// has no base URL.
    pub fn resolve(&self, name: &str) -> Result<String, LoaderError> {
        let mut segments = name.split('.');
        let root = segments.next().unwrap_or_default();
        let base_url = self
            .roots
            .get(root)
            .ok_or_else(|| LoaderError::UnknownRoot {
                root: root.to_string(),
                unit: name.to_string(),
            })?;
        let path: Vec<&str> = segments.collect();
        let url = format!("{}{}{}", base_url, path.join("/"), self.suffix);
        Ok(self.absolutize(strip_leading_slash(&url)))
    }

    /// Locates a dependency given either as a literal URL or a dotted name.
    pub fn locate(&self, dependency: &str) -> Result<Location, LoaderError> {
        if is_direct_url(dependency) {
            Ok(Location {
                url: self.absolutize(strip_leading_slash(dependency)),
                direct: true,
            })
        } else {
            Ok(Location {
                url: self.resolve(dependency)?,
                direct: false,
            })
        }
    }

    /// Joins a relative URL onto the default prefix, if one is configured.
    pub fn absolutize(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.default_prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), url),
            None => url.to_string(),
        }
    }
}

fn strip_leading_slash(url: &str) -> &str {
    url.strip_prefix('/').unwrap_or(url)
}
