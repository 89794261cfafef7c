//! Contract compliance tests for core_types
//!
//! Values handed between units must be shareable across the threads that
//! deliver fetch completions.

use core_types::{ErrorKind, LoaderError, Object, Value};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_value_is_send_sync() {
    assert_send_sync::<Value>();
}

#[test]
fn test_object_is_send_sync() {
    assert_send_sync::<Object>();
}

#[test]
fn test_loader_error_is_send_sync() {
    assert_send_sync::<LoaderError>();
}

#[test]
fn test_loader_error_is_std_error() {
    let error: Box<dyn std::error::Error> = Box::new(LoaderError::EmptyName);
    assert_eq!(error.to_string(), "unit name cannot be empty");
}

#[test]
fn test_every_error_has_kind() {
    let kinds = [
        LoaderError::EmptyName.kind(),
        LoaderError::Stalled(vec![]).kind(),
        LoaderError::initializer("u", "e".into()).kind(),
        LoaderError::script("u", "e").kind(),
    ];
    assert_eq!(
        kinds,
        [
            ErrorKind::ConfigurationError,
            ErrorKind::StalledDependency,
            ErrorKind::InitializerError,
            ErrorKind::ScriptError,
        ]
    );
}
