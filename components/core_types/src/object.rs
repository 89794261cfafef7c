//! Shared property bags.
//!
//! An [`Object`] is a reference-counted map from property names to values.
//! Cloning an object clones the handle, not the properties, so every clone
//! observes the same bindings. Namespaces are trees of objects.

use crate::Value;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A shared, lockable map of named values.
///
/// # Examples
///
/// ```
/// use core_types::{Object, Value};
///
/// let sop = Object::new();
/// let alias = sop.clone();
/// alias.set("version", Value::from("1.0"));
///
/// assert_eq!(sop.get("version"), Some(Value::from("1.0")));
/// assert!(sop.ptr_eq(&alias));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    properties: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.properties.read().get(key).cloned()
    }

    /// Binds `value` to `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.write().insert(key.into(), value)
    }

    /// Removes the binding for `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.properties.write().remove(key)
    }

    /// Returns true if `key` is bound.
    pub fn contains(&self, key: &str) -> bool {
        self.properties.read().contains_key(key)
    }

    /// Returns the child object bound to `key`, creating it first if the key
    /// is unbound or bound to something that is not an object.
    pub fn child_object(&self, key: &str) -> Object {
        let mut properties = self.properties.write();
        match properties.get(key) {
            Some(Value::Object(child)) => child.clone(),
            _ => {
                let child = Object::new();
                properties.insert(key.to_string(), Value::Object(child.clone()));
                child
            }
        }
    }

    /// Returns the bound property names in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }

    /// Returns a snapshot of every binding.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.properties
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }

    /// Returns true if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.properties, &other.properties)
    }

    /// Address of the shared bindings; equal for every clone of a handle.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.properties) as usize
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.keys()).finish()
    }
}
