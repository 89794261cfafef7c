//! Dotted-path namespace binder.
//!
//! Ready units are published under their dotted name, so `sop.Url` ends up
//! as property `Url` of object `sop` in the root namespace.

use core_types::{Object, Value};

const SEPARATOR: char = '.';

/// Root of the published namespace tree.
///
/// # Examples
///
/// ```
/// use core_types::Value;
/// use unit_loader::Namespace;
///
/// let ns = Namespace::new();
/// ns.bind_path("sop.ui.Overlay", Value::Smi(1));
///
/// assert_eq!(ns.get_path("sop.ui.Overlay"), Some(Value::Smi(1)));
/// assert!(ns.get_path("sop.ui").unwrap().as_object().is_some());
/// assert_eq!(ns.get_path("sop.Missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    root: Object,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a namespace rooted at an existing object.
    pub fn with_root(root: Object) -> Self {
        Self { root }
    }

    /// The root object.
    pub fn root(&self) -> &Object {
        &self.root
    }

    /// Binds `value` at `path`, creating intermediate objects.
    ///
    /// An intermediate segment bound to a non-object is replaced by a fresh
    /// object. Leading and trailing separators are ignored. Returns false if
    /// the path has no segments.
    pub fn bind_path(&self, path: &str, value: Value) -> bool {
        let segments: Vec<&str> = path.trim_matches(SEPARATOR).split(SEPARATOR).collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        if last.is_empty() {
            return false;
        }

        let mut target = self.root.clone();
        for segment in parents {
            target = target.child_object(segment);
        }
        target.set(*last, value);
        true
    }

    /// Looks up the value at `path`.
    ///
    /// Returns `None` when a segment is missing, an intermediate value is not
    /// an object, or the value found is `Undefined`.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let mut current = Value::Object(self.root.clone());
        for segment in path.trim_matches(SEPARATOR).split(SEPARATOR) {
            current = current.as_object()?.get(segment)?;
        }
        if current.is_undefined() {
            None
        } else {
            Some(current)
        }
    }
}
