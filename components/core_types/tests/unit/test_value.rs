//! Unit tests for Value enum

use core_types::{Object, Value};

#[cfg(test)]
mod value_creation_tests {
    use super::*;

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(7), Value::Smi(7));
        assert_eq!(Value::from(1.5), Value::Double(1.5));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
    }

    #[test]
    fn test_value_from_object() {
        let obj = Object::new();
        let value = Value::from(obj.clone());
        assert!(value.as_object().unwrap().ptr_eq(&obj));
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Value::from("sop").as_str(), Some("sop"));
        assert_eq!(Value::Smi(1).as_str(), None);
    }
}

#[cfg(test)]
mod native_value_tests {
    use super::*;

    struct Router {
        routes: Vec<&'static str>,
    }

    #[test]
    fn test_native_roundtrip() {
        let value = Value::native(Router {
            routes: vec!["home", "about"],
        });
        let router = value.downcast_native::<Router>().unwrap();
        assert_eq!(router.routes.len(), 2);
    }

    #[test]
    fn test_native_clone_shares_payload() {
        let value = Value::native(Router { routes: vec![] });
        let copy = value.clone();
        let a = value.downcast_native::<Router>().unwrap();
        let b = copy.downcast_native::<Router>().unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }
}

#[cfg(test)]
mod value_conversion_tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Smi(-3).to_string(), "-3");
        assert_eq!(Value::Double(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Object(Object::new()).to_string(), "[object Object]");
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Boolean(true).type_of(), "boolean");
        assert_eq!(Value::Smi(1).type_of(), "number");
        assert_eq!(Value::from("s").type_of(), "string");
    }

    #[test]
    fn test_serialize_primitives() {
        assert_eq!(serde_json::to_string(&Value::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Smi(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Value::from("a")).unwrap(), "\"a\"");
    }
}
