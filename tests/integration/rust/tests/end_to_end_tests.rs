//! End-to-end loading scenarios
//!
//! A small application graph is served from an in-memory bundle, the way a
//! page would pull its units from the server:
//! - `sop.Message` needs `sop.Url` and the vendored `lib/jquery.js`
//! - `sop.Url` and `sop.ui.Overlay` share `sop.MemCache`
//! - `app.Main` needs everything

use core_types::{ErrorKind, Value};
use unit_loader::{
    BundleFetcher, Loader, LoaderConfig, LoaderError, ScriptBundle, UnitDescriptor, UnitStatus,
};

fn application_bundle() -> ScriptBundle {
    let bundle = ScriptBundle::new();
    bundle
        .insert("http://example.com/sop/MemCache.js", |loader| {
            loader.define(UnitDescriptor::new("sop.MemCache").init(|_| Ok(Value::from("cache"))))
        })
        .insert("http://example.com/sop/Url.js", |loader| {
            loader.define(
                UnitDescriptor::new("sop.Url")
                    .requires(["sop.MemCache"])
                    .init(|deps| Ok(Value::from(format!("url[{}]", deps[0])))),
            )
        })
        .insert("http://example.com/sop/Message.js", |loader| {
            loader.define(
                UnitDescriptor::new("sop.Message")
                    .requires(["sop.Url", "lib/jquery.js"])
                    .init(|deps| Ok(Value::from(format!("message[{}]", deps[0])))),
            )
        })
        .insert("http://example.com/sop/ui/Overlay.js", |loader| {
            loader.define(
                UnitDescriptor::new("sop.ui.Overlay")
                    .requires(["sop.MemCache"])
                    .init(|deps| Ok(Value::from(format!("overlay[{}]", deps[0])))),
            )
        })
        .insert("http://example.com/lib/jquery.js", |_| Ok(()));
    bundle
}

fn application_loader(bundle: ScriptBundle) -> Loader {
    let config = LoaderConfig::from_json(
        r#"{
            "roots": { "sop": "http://example.com/sop" },
            "default_prefix": "http://example.com",
            "debug": true
        }"#,
    )
    .unwrap();
    Loader::with_config(config, BundleFetcher::new(bundle))
}

#[test]
fn test_application_graph_loads() {
    let _ = tracing_subscriber::fmt::try_init();
    let bundle = application_bundle();
    let mut loader = application_loader(bundle.clone());

    loader
        .define(
            UnitDescriptor::new("app.Main")
                .requires(["sop.Message", "sop.ui.Overlay"])
                .init(|deps| Ok(Value::from(format!("{} {}", deps[0], deps[1])))),
        )
        .unwrap();
    assert!(!loader.is_ready("app.Main"));

    loader.run_until_settled(None).unwrap();

    assert_eq!(
        loader.lookup("app.Main"),
        Some(Value::from("message[url[cache]] overlay[cache]"))
    );
    assert!(loader.pending_units().is_empty());
    assert!(bundle.is_empty());
    assert_eq!(
        loader.unit("lib/jquery.js").unwrap().url(),
        Some("http://example.com/lib/jquery.js")
    );
}

#[test]
fn test_namespace_tree_after_loading() {
    let mut loader = application_loader(application_bundle());
    loader
        .define(UnitDescriptor::new("app.Main").requires(["sop.ui.Overlay", "sop.Url"]))
        .unwrap();
    loader.run_until_settled(None).unwrap();

    let sop = loader.namespace().root().get("sop").unwrap();
    let sop = sop.as_object().unwrap();
    assert!(sop.contains("MemCache"));
    assert!(sop.contains("Url"));
    assert!(sop.get("ui").unwrap().as_object().unwrap().contains("Overlay"));
    assert!(!loader.namespace().root().contains("lib"));
}

#[test]
fn test_each_unit_fetched_once() {
    let bundle = application_bundle();
    let mut loader = application_loader(bundle.clone());
    for name in ["app.One", "app.Two", "app.Three"] {
        loader
            .define(UnitDescriptor::new(name).requires(["sop.Message", "sop.Url"]))
            .unwrap();
    }
    loader.run_until_settled(None).unwrap();

    // The overlay was never requested, so its script is still there.
    assert_eq!(bundle.len(), 1);
    assert!(bundle.contains("http://example.com/sop/ui/Overlay.js"));
    assert!(loader.is_ready("app.Three"));
}

#[test]
fn test_missing_script_stalls_with_deadline() {
    let bundle = application_bundle();
    bundle.take("http://example.com/sop/MemCache.js");
    let mut loader = application_loader(bundle);
    loader
        .define(UnitDescriptor::new("app.Main").requires(["sop.Url"]))
        .unwrap();

    let err = loader
        .run_until_settled(Some(std::time::Duration::from_secs(1)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StalledDependency);
    match err {
        LoaderError::Stalled(units) => {
            assert_eq!(units, vec!["app.Main", "sop.MemCache", "sop.Url"])
        }
        other => panic!("unexpected error: {other}"),
    }

    let snapshot = serde_json::to_value(loader.get_all_units()).unwrap();
    assert_eq!(snapshot["sop.Url"]["unready_dependencies"][0], "sop.MemCache");
}

#[test]
fn test_late_definition_unblocks_stalled_graph() {
    let bundle = application_bundle();
    bundle.take("http://example.com/sop/MemCache.js");
    let mut loader = application_loader(bundle);
    loader
        .define(UnitDescriptor::new("app.Main").requires(["sop.ui.Overlay"]))
        .unwrap();
    loader.run_until_settled(None).unwrap();
    assert_eq!(
        loader.unit("sop.MemCache").unwrap().status(),
        UnitStatus::Unannounced
    );

    loader
        .define(UnitDescriptor::new("sop.MemCache").init(|_| Ok(Value::from("inline"))))
        .unwrap();
    assert_eq!(
        loader.value("sop.ui.Overlay"),
        Some(&Value::from("overlay[inline]"))
    );
    assert!(loader.is_ready("app.Main"));
}
