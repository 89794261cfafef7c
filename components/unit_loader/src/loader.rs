//! The loader: unit graph, fetch scheduling and ready propagation.
//!
//! A [`Loader`] owns everything a dependency graph needs: the name resolver,
//! the unit registry with its namespace, the fetcher and the event loop.
//! Independent loaders never share state.
//!
//! `define` registers a unit and schedules one fetch per dependency it has
//! never heard of. Fetch completions are queued by the fetcher and handled by
//! [`Loader::run_until_idle`] or [`Loader::run_until_settled`], which run the
//! fetched script and then propagate readiness through the ready queue.
//!
//! # Examples
//!
//! ```
//! use unit_loader::{BundleFetcher, Loader, ScriptBundle, UnitDescriptor, Value};
//!
//! let bundle = ScriptBundle::new();
//! bundle.insert("http://example.com/src/Url.js", |loader| {
//!     loader.define(UnitDescriptor::new("sop.Url").init(|_| Ok(Value::from("url"))))
//! });
//!
//! let mut loader = Loader::new(BundleFetcher::new(bundle));
//! loader.set_root_base_url("sop", "http://example.com/src");
//! loader
//!     .define(
//!         UnitDescriptor::new("sop.Message")
//!             .requires(["sop.Url"])
//!             .init(|deps| Ok(deps[0].clone())),
//!     )
//!     .unwrap();
//! assert!(!loader.is_ready("sop.Message"));
//!
//! loader.run_until_idle().unwrap();
//! assert_eq!(loader.value("sop.Message"), Some(&Value::from("url")));
//! ```

use crate::config::LoaderConfig;
use crate::descriptor::UnitDescriptor;
use crate::event_loop::EventLoop;
use crate::fetcher::{FetchRequest, ScriptFetcher};
use crate::namespace::Namespace;
use crate::registry::UnitRegistry;
use crate::resolver::{is_direct_url, Location, NameResolver};
use crate::task_queue::FetchTask;
use crate::unit::{Unit, UnitSnapshot, UnitState, UnitStatus};
use core_types::{ErrorKind, LoaderError, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// An isolated dependency graph and the machinery that drives it.
pub struct Loader {
    resolver: NameResolver,
    registry: UnitRegistry,
    fetcher: Box<dyn ScriptFetcher>,
    event_loop: EventLoop,
    debug: bool,
}

impl Loader {
    /// Creates a loader with default configuration.
    pub fn new(fetcher: impl ScriptFetcher + 'static) -> Self {
        Self::with_config(LoaderConfig::default(), fetcher)
    }

    /// Creates a loader from `config`.
    pub fn with_config(config: LoaderConfig, fetcher: impl ScriptFetcher + 'static) -> Self {
        Self {
            resolver: NameResolver::from_config(&config),
            registry: UnitRegistry::new(),
            fetcher: Box::new(fetcher),
            event_loop: EventLoop::new(),
            debug: config.debug,
        }
    }

    /// Publishes ready units into `namespace` instead of a fresh one.
    ///
    /// Units already known are kept; those already Ready are bound into
    /// `namespace` too.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.registry.set_namespace(namespace);
        self
    }

    /// Binds a root name to a base URL.
    pub fn set_root_base_url(&mut self, root: &str, base_url: &str) -> &mut Self {
        self.resolver.set_root_base_url(root, base_url);
        self
    }

    /// The name resolver.
    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// The unit registry.
    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// The namespace ready units are published into.
    pub fn namespace(&self) -> &Namespace {
        self.registry.namespace()
    }

    /// Reads a published value by dotted path.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        self.registry.namespace().get_path(path)
    }

    /// The unit named `name`.
    pub fn unit(&self, name: &str) -> Option<&Unit> {
        self.registry.get(name)
    }

    /// The value of `name`, once Ready.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.registry.value(name)
    }

    /// True if `name` is Ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.registry.is_ready(name)
    }

    /// Copies every known unit, placeholders included.
    pub fn get_all_units(&self) -> BTreeMap<String, UnitSnapshot> {
        self.registry.snapshot()
    }

    /// Units that are neither Ready nor Failed, in name order.
    pub fn pending_units(&self) -> Vec<String> {
        self.registry
            .iter()
            .filter(|unit| !unit.is_settled())
            .map(|unit| unit.name().to_string())
            .collect()
    }

    /// Fetches scheduled whose completion has not been received yet.
    pub fn outstanding_fetches(&self) -> usize {
        self.event_loop.outstanding()
    }

    /// Registers a unit.
    ///
    /// Unknown dependencies become placeholders and are fetched, each exactly
    /// once. If every dependency is already Ready the initializer runs before
    /// this returns, and so does any initialization it unblocks.
    ///
    /// # Arguments
    ///
    /// * `descriptor` - Name, dependencies and initializer of the unit
    ///
    /// # Returns
    ///
    /// `Ok(())` once the unit is registered, Ready or not. Configuration
    /// errors (`EmptyName`, `DuplicateDefinition`, `UnknownRoot`) are
    /// reported before the graph is touched; an initializer error is
    /// returned after its unit moved to Failed.
    pub fn define(&mut self, descriptor: UnitDescriptor) -> Result<(), LoaderError> {
        let (name, dependencies, init) = descriptor.into_parts();
        if name.is_empty() {
            return Err(LoaderError::EmptyName);
        }
        if self.registry.get(&name).is_some_and(Unit::is_settled) {
            return Err(LoaderError::DuplicateDefinition(name));
        }

        let mut fetches: Vec<(String, Location)> = Vec::new();
        for dependency in &dependencies {
            if *dependency == name
                || self.registry.contains(dependency)
                || fetches.iter().any(|(known, _)| known == dependency)
            {
                continue;
            }
            let location = self.resolver.locate(dependency)?;
            fetches.push((dependency.clone(), location));
        }

        let mut unready: Vec<String> = Vec::new();
        for dependency in &dependencies {
            if !self.registry.is_ready(dependency) && !unready.contains(dependency) {
                unready.push(dependency.clone());
            }
        }

        tracing::debug!(unit = %name, dependencies = ?dependencies, "define");
        let unit = self.registry.get_or_create(&name);
        if unit.announce(dependencies.clone(), unready, init) {
            tracing::debug!(unit = %name, "replacing pending definition");
        }

        for (dependency, location) in &fetches {
            self.registry
                .get_or_create(dependency)
                .set_location(location.url.clone(), location.direct);
        }
        for dependency in &dependencies {
            self.registry.get_or_create(dependency).add_dependent(&name);
        }
        for (dependency, location) in fetches {
            self.schedule_fetch(dependency, location);
        }

        let initialized = self.try_init(&name);
        let propagated = self.drain_ready();
        initialized.and(propagated)
    }

    /// Handles every completion already received, without blocking.
    ///
    /// All queued completions are processed even if one fails; the first
    /// error is returned.
    pub fn run_until_idle(&mut self) -> Result<(), LoaderError> {
        let mut first_error = None;
        while let Some(task) = self.event_loop.try_next_task() {
            if let Err(error) = self.process_task(task) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Handles completions until no fetch is outstanding.
    ///
    /// Blocks the calling thread while waiting; see [`ThreadedFetcher`] for
    /// driving a loader next to a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `deadline` - Longest time to wait, or `None` to wait for every
    ///   outstanding fetch
    ///
    /// # Returns
    ///
    /// The first script or initializer error met, if any. Otherwise, with a
    /// `deadline`, [`LoaderError::Stalled`] naming the units still waiting
    /// when it passed or when the last fetch finished without readying
    /// them. Without one, waiting units are left pending and `Ok(())` is
    /// returned.
    ///
    /// [`ThreadedFetcher`]: crate::ThreadedFetcher
    pub fn run_until_settled(&mut self, deadline: Option<Duration>) -> Result<(), LoaderError> {
        let until = deadline.map(|timeout| Instant::now() + timeout);
        let mut first_error = None;

        while self.event_loop.outstanding() > 0 {
            let task = match until {
                Some(until) => {
                    let remaining = until.saturating_duration_since(Instant::now());
                    match self.event_loop.next_task_timeout(remaining) {
                        Some(task) => task,
                        None => break,
                    }
                }
                None => match self.event_loop.next_task() {
                    Some(task) => task,
                    None => break,
                },
            };
            if let Err(error) = self.process_task(task) {
                first_error.get_or_insert(error);
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }
        if deadline.is_some() {
            let waiting = self.pending_units();
            if !waiting.is_empty() {
                tracing::warn!(units = ?waiting, "units never became ready");
                return Err(LoaderError::Stalled(waiting));
            }
        }
        Ok(())
    }

    fn schedule_fetch(&mut self, unit: String, location: Location) {
        if self.debug {
            tracing::info!(unit = %unit, url = %location.url, "loading");
        } else {
            tracing::debug!(unit = %unit, url = %location.url, "fetch scheduled");
        }
        let request = FetchRequest {
            unit,
            url: location.url,
            direct: location.direct,
        };
        let completion = self.event_loop.completion(request);
        self.fetcher.fetch(completion);
    }

    /// Runs the initializer of `name` if nothing blocks it any more.
    ///
    /// Anything but a Pending unit is left alone, so calling this again
    /// after Ready is a no-op.
    fn try_init(&mut self, name: &str) -> Result<(), LoaderError> {
        let Some(unit) = self.registry.get(name) else {
            return Ok(());
        };
        let UnitState::Pending { unready, .. } = unit.state() else {
            return Ok(());
        };
        let remaining: Vec<String> = unready
            .iter()
            .filter(|dependency| !self.registry.is_ready(dependency))
            .cloned()
            .collect();
        if !remaining.is_empty() {
            if let Some(unit) = self.registry.get_mut(name) {
                unit.set_unready(remaining);
            }
            return Ok(());
        }

        let args: Vec<Value> = unit
            .dependencies()
            .iter()
            .map(|dependency| self.registry.value(dependency).cloned().unwrap_or_default())
            .collect();
        let Some(init) = self.registry.get_mut(name).and_then(Unit::begin_init) else {
            return Ok(());
        };

        match init(args) {
            Ok(value) => {
                if !is_direct_url(name) {
                    self.registry.publish(name, value.clone());
                }
                if let Some(unit) = self.registry.get_mut(name) {
                    unit.finish(value);
                }
                tracing::debug!(unit = %name, "ready");
                self.event_loop.enqueue_ready(name.to_string());
                Ok(())
            }
            Err(source) => {
                let error = LoaderError::initializer(name, source);
                tracing::warn!(unit = %name, error = %error, "initializer failed");
                if let Some(unit) = self.registry.get_mut(name) {
                    unit.fail(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Re-checks the dependents of every unit that became Ready until no
    /// readiness event is left.
    fn drain_ready(&mut self) -> Result<(), LoaderError> {
        let mut first_error = None;
        while let Some(ready) = self.event_loop.next_ready() {
            let dependents = self
                .registry
                .get(&ready)
                .map(|unit| unit.depended_by().to_vec())
                .unwrap_or_default();
            for dependent in dependents {
                tracing::trace!(unit = %dependent, dependency = %ready, "dependency ready");
                if let Err(error) = self.try_init(&dependent) {
                    first_error.get_or_insert(error);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn process_task(&mut self, task: FetchTask) -> Result<(), LoaderError> {
        match task {
            FetchTask::Completed { request, script } => {
                let executed = script(&mut *self).map_err(|error| match error.kind() {
                    ErrorKind::InitializerError => error,
                    _ => LoaderError::script(&request.url, error.to_string()),
                });
                self.on_fetch_complete(&request);
                let propagated = self.drain_ready();
                executed.and(propagated)
            }
            FetchTask::Abandoned { request } => {
                tracing::warn!(
                    unit = %request.unit,
                    url = %request.url,
                    "fetch abandoned, unit stays pending"
                );
                Ok(())
            }
        }
    }

    fn on_fetch_complete(&mut self, request: &FetchRequest) {
        if self.debug {
            tracing::info!(unit = %request.unit, url = %request.url, "loaded");
        }
        let Some(unit) = self.registry.get_mut(&request.unit) else {
            return;
        };
        if request.direct {
            if unit.mark_loaded() {
                tracing::debug!(unit = %request.unit, "ready");
                self.event_loop.enqueue_ready(request.unit.clone());
            }
        } else if unit.status() == UnitStatus::Unannounced {
            tracing::warn!(
                unit = %request.unit,
                url = %request.url,
                "fetched script did not define its unit"
            );
        }
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("resolver", &self.resolver)
            .field("units", &self.registry.len())
            .field("outstanding_fetches", &self.event_loop.outstanding())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
