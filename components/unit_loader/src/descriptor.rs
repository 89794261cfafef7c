//! What a `define` call registers.

use crate::unit::Initializer;
use core_types::{InitError, Value};
use std::fmt;

/// A unit definition: name, dependencies, initializer.
///
/// # Examples
///
/// ```
/// use unit_loader::{UnitDescriptor, Value};
///
/// let descriptor = UnitDescriptor::new("sop.Message")
///     .requires(["sop.Url", "lib/jquery.js"])
///     .init(|deps| Ok(Value::from(deps.len() as i32)));
///
/// assert_eq!(descriptor.name(), "sop.Message");
/// assert_eq!(descriptor.dependencies().len(), 2);
/// ```
pub struct UnitDescriptor {
    name: String,
    requires: Vec<String>,
    init: Initializer,
}

impl UnitDescriptor {
    /// A descriptor with no dependencies whose initializer yields `Undefined`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            init: Box::new(|_: Vec<Value>| -> Result<Value, InitError> { Ok(Value::Undefined) }),
        }
    }

    /// Sets the dependencies, dotted names or literal URLs, in the order
    /// their values are passed to the initializer.
    pub fn requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = requires.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initializer.
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: FnOnce(Vec<Value>) -> Result<Value, InitError> + Send + 'static,
    {
        self.init = Box::new(init);
        self
    }

    /// The unit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared dependencies.
    pub fn dependencies(&self) -> &[String] {
        &self.requires
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>, Initializer) {
        (self.name, self.requires, self.init)
    }
}

impl fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}
