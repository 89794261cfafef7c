//! Unit tests for loader configuration

use std::io::Write;
use unit_loader::{DeferredFetcher, ErrorKind, Loader, LoaderConfig, UnitDescriptor};

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "roots": {{ "sop": "/static/sop" }}, "default_prefix": "http://example.com" }}"#
    )
    .unwrap();

    let config = LoaderConfig::from_path(file.path()).unwrap();
    assert_eq!(config.suffix, ".js");

    let fetcher = DeferredFetcher::new();
    let handle = fetcher.handle();
    let mut loader = Loader::with_config(config, fetcher);
    loader
        .define(UnitDescriptor::new("app").requires(["sop.Url", "lib/x.js"]))
        .unwrap();
    assert_eq!(
        handle.requested_urls(),
        vec![
            "http://example.com/static/sop/Url.js",
            "http://example.com/lib/x.js"
        ]
    );
}

#[test]
fn test_missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LoaderConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
}

#[test]
fn test_unknown_field_rejected() {
    let err = LoaderConfig::from_json(r#"{ "rootz": {} }"#).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_builder_roots_override() {
    let config = LoaderConfig::from_json(r#"{ "roots": { "sop": "http://a.example/" } }"#)
        .unwrap()
        .with_root("sop", "http://b.example/");
    let fetcher = DeferredFetcher::new();
    let handle = fetcher.handle();
    let mut loader = Loader::with_config(config, fetcher);
    loader
        .define(UnitDescriptor::new("app").requires(["sop.Url"]))
        .unwrap();
    assert_eq!(handle.requested_urls(), vec!["http://b.example/Url.js"]);
}
