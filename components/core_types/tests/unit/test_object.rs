//! Unit tests for Object

use core_types::{Object, Value};

#[test]
fn test_new_object_is_empty() {
    let obj = Object::new();
    assert!(obj.is_empty());
    assert_eq!(obj.len(), 0);
}

#[test]
fn test_clones_share_properties() {
    let obj = Object::new();
    let alias = obj.clone();
    alias.set("x", Value::Smi(1));
    assert_eq!(obj.get("x"), Some(Value::Smi(1)));
}

#[test]
fn test_distinct_objects_not_equal() {
    let a = Value::Object(Object::new());
    let b = Value::Object(Object::new());
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn test_remove_binding() {
    let obj = Object::new();
    obj.set("x", Value::Null);
    assert!(obj.contains("x"));
    assert_eq!(obj.remove("x"), Some(Value::Null));
    assert!(!obj.contains("x"));
}

#[test]
fn test_nested_child_objects() {
    let root = Object::new();
    root.child_object("a").child_object("b").set("c", Value::Smi(3));

    let a = root.get("a").unwrap();
    let b = a.as_object().unwrap().get("b").unwrap();
    assert_eq!(b.as_object().unwrap().get("c"), Some(Value::Smi(3)));
}

#[test]
fn test_shared_across_threads() {
    let obj = Object::new();
    let handle = {
        let obj = obj.clone();
        std::thread::spawn(move || {
            obj.set("from_thread", Value::Boolean(true));
        })
    };
    handle.join().unwrap();
    assert_eq!(obj.get("from_thread"), Some(Value::Boolean(true)));
}
