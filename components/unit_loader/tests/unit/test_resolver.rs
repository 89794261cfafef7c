//! Unit tests for NameResolver

use unit_loader::{is_direct_url, DeferredFetcher, Loader, LoaderError, NameResolver};

#[test]
fn test_single_segment_name() {
    let mut resolver = NameResolver::new();
    resolver.set_root_base_url("sop", "http://example.com/src/");
    assert_eq!(resolver.resolve("sop").unwrap(), "http://example.com/src/.js");
}

#[test]
fn test_locate_direct_url_verbatim() {
    let resolver = NameResolver::new();
    let location = resolver.locate("vendor/jquery.min.js").unwrap();
    assert!(location.direct);
    assert_eq!(location.url, "vendor/jquery.min.js");
    assert!(is_direct_url("vendor/jquery.min.js"));
}

#[test]
fn test_unknown_root_message() {
    let err = NameResolver::new().resolve("app.Main").unwrap_err();
    assert!(matches!(err, LoaderError::UnknownRoot { .. }));
    assert!(err.to_string().contains("url prefix for root: app does not exist"));
}

#[test]
fn test_set_root_base_url_chains() {
    let mut loader = Loader::new(DeferredFetcher::new());
    loader
        .set_root_base_url("sop", "http://example.com/sop")
        .set_root_base_url("app", "http://example.com/app");
    assert_eq!(
        loader.resolver().resolve("app.Main").unwrap(),
        "http://example.com/app/Main.js"
    );
    assert_eq!(loader.resolver().base_url("sop"), Some("http://example.com/sop/"));
}
