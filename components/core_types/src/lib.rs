//! Shared value and error types for the unit loader.
//!
//! This crate provides the vocabulary every loader component speaks:
//! the dynamic values units publish, the shared objects that make up a
//! namespace tree, and the loader error taxonomy.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of a published unit value
//! - [`Object`] - Shared, lockable property bag (namespace containers)
//! - [`LoaderError`] - Errors raised while defining or loading units
//! - [`ErrorKind`] - Coarse classification of a [`LoaderError`]
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, LoaderError, Object, Value};
//!
//! let ns = Object::new();
//! ns.set("answer", Value::Smi(42));
//! assert_eq!(ns.get("answer"), Some(Value::Smi(42)));
//!
//! let error = LoaderError::DuplicateDefinition("sop.Url".to_string());
//! assert_eq!(error.kind(), ErrorKind::ConfigurationError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod object;
mod value;

pub use error::{ErrorKind, InitError, LoaderError};
pub use object::Object;
pub use value::{NativeRef, Value};
