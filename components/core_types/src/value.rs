//! Published unit values.
//!
//! A unit's initializer returns a [`Value`]; the loader hands the same value
//! to every dependent and binds it into the namespace. Values are cheap to
//! clone: objects and native payloads are shared handles.

use crate::Object;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an opaque Rust value published by a unit.
pub type NativeRef = Arc<dyn Any + Send + Sync>;

/// Represents any value a unit can publish.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// let undefined = Value::Undefined;
/// let number = Value::Smi(42);
/// let float = Value::Double(3.14);
///
/// assert!(!undefined.is_truthy());
/// assert!(number.is_truthy());
/// assert_eq!(float.type_of(), "number");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// No value; what an initializer without a result publishes
    #[default]
    Undefined,
    /// Explicit absence of a value
    Null,
    /// Boolean
    Boolean(bool),
    /// Small integer
    Smi(i32),
    /// Double-precision floating point
    Double(f64),
    /// String
    String(String),
    /// Shared property bag
    Object(Object),
    /// Opaque Rust value (a constructor, a service handle, ...)
    Native(NativeRef),
}

impl Value {
    /// Wraps an arbitrary Rust value.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::Value;
    ///
    /// struct Cache { capacity: usize }
    ///
    /// let value = Value::native(Cache { capacity: 16 });
    /// let cache = value.downcast_native::<Cache>().unwrap();
    /// assert_eq!(cache.capacity, 16);
    /// ```
    pub fn native<T: Any + Send + Sync>(value: T) -> Self {
        Value::Native(Arc::new(value))
    }

    /// Returns the native payload if it has type `T`.
    pub fn downcast_native<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Native(native) => native.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Returns the object handle if this value is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns whether this value is truthy.
    ///
    /// `undefined`, `null`, `false`, `0`, `NaN` and the empty string are
    /// falsy; everything else, including every object, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Smi(n) => *n != 0,
            Value::Double(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
            Value::Native(_) => true,
        }
    }

    /// Returns the type name of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{Object, Value};
    ///
    /// assert_eq!(Value::Undefined.type_of(), "undefined");
    /// assert_eq!(Value::Null.type_of(), "object");
    /// assert_eq!(Value::Object(Object::new()).type_of(), "object");
    /// assert_eq!(Value::native(1u8).type_of(), "native");
    /// ```
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Boolean(_) => "boolean",
            Value::Smi(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Native(_) => "native",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Smi(n) => f.debug_tuple("Smi").field(n).finish(),
            Value::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Object(obj) => fmt::Debug::fmt(obj, f),
            Value::Native(_) => write!(f, "Native(...)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Smi(a), Value::Smi(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Native(a), Value::Native(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Smi(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Native(_) => write!(f, "[native]"),
        }
    }
}

/// Objects serialize as maps, native payloads as the string `"[native]"`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Guarded {
            value: self,
            ancestors: &[],
        }
        .serialize(serializer)
    }
}

/// A value being serialized below the objects listed in `ancestors`.
///
/// Objects are shared handles and may contain themselves; an object met again
/// on its own path is written as `"[circular]"`.
struct Guarded<'a> {
    value: &'a Value,
    ancestors: &'a [usize],
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Undefined | Value::Null => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Smi(n) => serializer.serialize_i32(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Object(obj) => {
                let id = obj.id();
                if self.ancestors.contains(&id) {
                    return serializer.serialize_str("[circular]");
                }
                let mut path = self.ancestors.to_vec();
                path.push(id);

                let entries = obj.entries();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    map.serialize_entry(
                        key,
                        &Guarded {
                            value,
                            ancestors: &path,
                        },
                    )?;
                }
                map.end()
            }
            Value::Native(_) => serializer.serialize_str("[native]"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Smi(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}
