//! Contract compliance tests for unit_loader
//!
//! Fetch completions may be produced on any thread; everything that crosses
//! that boundary must be Send.

use std::collections::BTreeMap;
use unit_loader::{
    BundleFetcher, DeferredFetcher, FetchCompletion, Loader, LoaderError, Namespace,
    ScriptBundle, ThreadedFetcher, UnitDescriptor, UnitSnapshot, UnitStatus, Value,
};

fn assert_send<T: Send>() {}
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_loader_is_send() {
    assert_send::<Loader>();
}

#[test]
fn test_completion_is_send() {
    assert_send::<FetchCompletion>();
}

#[test]
fn test_shared_types_are_send_sync() {
    assert_send_sync::<ScriptBundle>();
    assert_send_sync::<Namespace>();
    assert_send_sync::<ThreadedFetcher>();
    assert_send_sync::<DeferredFetcher>();
}

#[test]
fn test_loader_moves_across_threads() {
    let mut loader = Loader::new(BundleFetcher::new(ScriptBundle::new()));
    let loader = std::thread::spawn(move || {
        loader.define(UnitDescriptor::new("sop.Url")).unwrap();
        loader
    })
    .join()
    .unwrap();
    assert!(loader.is_ready("sop.Url"));
}

#[test]
fn test_get_all_units_contract() {
    let mut loader = Loader::new(DeferredFetcher::new());
    loader.set_root_base_url("sop", "http://example.com/");
    loader
        .define(UnitDescriptor::new("sop.A").requires(["sop.B"]))
        .unwrap();
    loader
        .define(UnitDescriptor::new("sop.C").init(|_| Ok(Value::from(3))))
        .unwrap();

    let units: BTreeMap<String, UnitSnapshot> = loader.get_all_units();
    let names: Vec<&str> = units.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["sop.A", "sop.B", "sop.C"]);

    let b = &units["sop.B"];
    assert_eq!(b.status, UnitStatus::Unannounced);
    assert_eq!(b.depended_by, vec!["sop.A"]);
    assert!(b.value.is_none());
    assert_eq!(units["sop.C"].value, Some(Value::from(3)));
}

#[test]
fn test_define_errors_are_configuration_errors() {
    let mut loader = Loader::new(DeferredFetcher::new());
    loader.define(UnitDescriptor::new("x")).unwrap();
    let errors: Vec<LoaderError> = vec![
        loader.define(UnitDescriptor::new("")).unwrap_err(),
        loader.define(UnitDescriptor::new("x")).unwrap_err(),
        loader
            .define(UnitDescriptor::new("y").requires(["nowhere.Z"]))
            .unwrap_err(),
    ];
    assert!(errors.iter().all(LoaderError::is_configuration));
}
