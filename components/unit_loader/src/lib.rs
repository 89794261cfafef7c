//! Asynchronous unit loader.
//!
//! Registers named units of code, fetches the dependencies nobody has
//! defined yet, and runs each unit's initializer exactly once, as soon as all
//! of its dependencies are Ready. Dependency values are passed to the
//! initializer in declaration order, whatever order they finished in.
//!
//! # Overview
//!
//! - [`Loader`] owns one dependency graph and drives it
//! - [`UnitDescriptor`] is what `define` registers
//! - [`NameResolver`] turns `root.path.Name` into a fetch URL
//! - [`ScriptFetcher`] retrieves code; [`BundleFetcher`], [`DeferredFetcher`]
//!   and [`ThreadedFetcher`] are provided
//! - [`Namespace`] receives every Ready unit's value under its dotted name
//!
//! # Examples
//!
//! ```
//! use unit_loader::{DeferredFetcher, Loader, UnitDescriptor, Value};
//!
//! let fetcher = DeferredFetcher::new();
//! let handle = fetcher.handle();
//! let mut loader = Loader::new(fetcher);
//! loader.set_root_base_url("sop", "http://example.com/src/");
//!
//! loader
//!     .define(
//!         UnitDescriptor::new("sop.ui.Overlay")
//!             .requires(["sop.Url"])
//!             .init(|deps| Ok(Value::from(format!("overlay:{}", deps[0])))),
//!     )
//!     .unwrap();
//! assert_eq!(handle.requested_urls(), vec!["http://example.com/src/Url.js"]);
//!
//! handle.complete("http://example.com/src/Url.js", |loader| {
//!     loader.define(UnitDescriptor::new("sop.Url").init(|_| Ok(Value::from("u"))))
//! });
//! loader.run_until_idle().unwrap();
//!
//! assert_eq!(loader.lookup("sop.ui.Overlay"), Some(Value::from("overlay:u")));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod descriptor;
pub mod event_loop;
pub mod fetcher;
pub mod loader;
pub mod namespace;
pub mod registry;
pub mod resolver;
pub mod task_queue;
pub mod unit;

pub use config::LoaderConfig;
pub use descriptor::UnitDescriptor;
pub use event_loop::EventLoop;
pub use fetcher::{
    script, BundleFetcher, DeferredFetcher, DeferredHandle, FetchCompletion, FetchRequest,
    Script, ScriptBundle, ScriptFetcher, ScriptSource, ThreadedFetcher,
};
pub use loader::Loader;
pub use namespace::Namespace;
pub use registry::UnitRegistry;
pub use resolver::{is_direct_url, Location, NameResolver};
pub use task_queue::{FetchTask, ReadyQueue};
pub use unit::{Initializer, Unit, UnitSnapshot, UnitState, UnitStatus};

pub use core_types::{ErrorKind, InitError, LoaderError, Object, Value};
