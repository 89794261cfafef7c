//! Script fetching.
//!
//! The loader never retrieves code itself. For every placeholder it creates,
//! it hands a [`FetchCompletion`] to its [`ScriptFetcher`]. The fetcher
//! retrieves the code for the requested URL and calls
//! [`FetchCompletion::complete`] exactly once; the loop then executes the
//! script and only afterwards performs fetch-complete handling.
//!
//! Fetched code is modelled as a [`Script`]: a one-shot closure that runs
//! against the loader, usually to `define` the unit it was fetched for.

use crate::Loader;
use async_trait::async_trait;
use core_types::LoaderError;
use crossbeam::channel::Sender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::task_queue::FetchTask;

/// Fetched code, executed once by the loader.
pub type Script = Box<dyn FnOnce(&mut Loader) -> Result<(), LoaderError> + Send>;

/// Boxes a closure as a [`Script`].
///
/// # Examples
///
/// ```
/// use unit_loader::{script, UnitDescriptor};
///
/// let s = script(|loader| loader.define(UnitDescriptor::new("sop.MemCache")));
/// # let _ = s;
/// ```
pub fn script<F>(f: F) -> Script
where
    F: FnOnce(&mut Loader) -> Result<(), LoaderError> + Send + 'static,
{
    Box::new(f)
}

/// One fetch the loader wants performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Unit the fetch is for
    pub unit: String,
    /// Location to fetch
    pub url: String,
    /// True for direct-URL units, which become Ready on completion alone
    pub direct: bool,
}

/// Exactly-once completion handle for a scheduled fetch.
///
/// [`complete`](Self::complete) consumes the handle, so a fetch cannot be
/// completed twice. Dropping the handle without completing reports the
/// fetch as abandoned; the unit then simply never becomes Ready.
pub struct FetchCompletion {
    request: FetchRequest,
    sender: Option<Sender<FetchTask>>,
}

impl FetchCompletion {
    pub(crate) fn new(request: FetchRequest, sender: Sender<FetchTask>) -> Self {
        Self {
            request,
            sender: Some(sender),
        }
    }

    /// The request being served.
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// The URL to fetch.
    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// Reports the fetched code.
    pub fn complete(mut self, script: Script) {
        if let Some(sender) = self.sender.take() {
            let request = std::mem::take(&mut self.request);
            // The loader may already be gone; nothing is waiting then.
            let _ = sender.send(FetchTask::Completed { request, script });
        }
    }

    /// Reports a fetch whose code registers nothing.
    pub fn complete_empty(self) {
        self.complete(script(|_| Ok(())));
    }
}

impl Drop for FetchCompletion {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let request = std::mem::take(&mut self.request);
            let _ = sender.send(FetchTask::Abandoned { request });
        }
    }
}

impl fmt::Debug for FetchCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCompletion")
            .field("request", &self.request)
            .field("pending", &self.sender.is_some())
            .finish()
    }
}

/// Retrieves code by URL on behalf of the loader.
///
/// Implementations must not block on the loader and must call
/// [`FetchCompletion::complete`] at most once per request (enforced by
/// ownership). No retry, no timeout and no deduplication happen here: the
/// loader only ever requests a unit once.
pub trait ScriptFetcher: Send {
    /// Starts retrieving `completion.url()`.
    fn fetch(&mut self, completion: FetchCompletion);
}

struct BundleEntry {
    script: Script,
    latency: Duration,
}

/// In-memory map of URL → script, shareable between fetchers.
///
/// Each script can be taken once.
#[derive(Clone, Default)]
pub struct ScriptBundle {
    entries: Arc<Mutex<HashMap<String, BundleEntry>>>,
}

impl ScriptBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the script served at `url`.
    pub fn insert<F>(&self, url: impl Into<String>, f: F) -> &Self
    where
        F: FnOnce(&mut Loader) -> Result<(), LoaderError> + Send + 'static,
    {
        self.insert_delayed(url, Duration::ZERO, f)
    }

    /// Adds the script served at `url` after `latency` (asynchronous
    /// sources only).
    pub fn insert_delayed<F>(&self, url: impl Into<String>, latency: Duration, f: F) -> &Self
    where
        F: FnOnce(&mut Loader) -> Result<(), LoaderError> + Send + 'static,
    {
        self.entries.lock().insert(
            url.into(),
            BundleEntry {
                script: Box::new(f),
                latency,
            },
        );
        self
    }

    /// Removes and returns the script at `url` with its latency.
    pub fn take(&self, url: &str) -> Option<(Script, Duration)> {
        self.entries
            .lock()
            .remove(url)
            .map(|entry| (entry.script, entry.latency))
    }

    /// Returns true if a script is still available at `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().contains_key(url)
    }

    /// Number of scripts not yet taken.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True if every script has been taken.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl fmt::Debug for ScriptBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let urls: Vec<String> = self.entries.lock().keys().cloned().collect();
        f.debug_struct("ScriptBundle").field("urls", &urls).finish()
    }
}

/// Serves scripts from a [`ScriptBundle`] immediately.
///
/// Completions are still delivered through the loader's queue, so they are
/// processed on the next loop turn, never inside `define`. Unknown URLs are
/// abandoned.
#[derive(Debug, Clone, Default)]
pub struct BundleFetcher {
    bundle: ScriptBundle,
}

impl BundleFetcher {
    /// Creates a fetcher over `bundle`.
    pub fn new(bundle: ScriptBundle) -> Self {
        Self { bundle }
    }

    /// The bundle being served.
    pub fn bundle(&self) -> &ScriptBundle {
        &self.bundle
    }
}

impl ScriptFetcher for BundleFetcher {
    fn fetch(&mut self, completion: FetchCompletion) {
        match self.bundle.take(completion.url()) {
            Some((script, _)) => completion.complete(script),
            None => {
                tracing::warn!(url = %completion.url(), "no script bundled at url");
            }
        }
    }
}

#[derive(Default)]
struct DeferredState {
    pending: Vec<FetchCompletion>,
    history: Vec<String>,
}

/// Holds every request until the host decides how it completes.
///
/// Use the [`DeferredHandle`] to complete requests in any order, which is
/// how asynchronous arrival is reproduced deterministically.
#[derive(Clone, Default)]
pub struct DeferredFetcher {
    state: Arc<Mutex<DeferredState>>,
}

impl DeferredFetcher {
    /// Creates a fetcher with no pending requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for completing requests later.
    pub fn handle(&self) -> DeferredHandle {
        DeferredHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl ScriptFetcher for DeferredFetcher {
    fn fetch(&mut self, completion: FetchCompletion) {
        let mut state = self.state.lock();
        state.history.push(completion.url().to_string());
        state.pending.push(completion);
    }
}

/// Completes requests held by a [`DeferredFetcher`].
#[derive(Clone)]
pub struct DeferredHandle {
    state: Arc<Mutex<DeferredState>>,
}

impl DeferredHandle {
    /// Every URL ever requested, in request order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    /// URLs requested but not completed or abandoned yet.
    pub fn pending_urls(&self) -> Vec<String> {
        self.state
            .lock()
            .pending
            .iter()
            .map(|c| c.url().to_string())
            .collect()
    }

    fn take(&self, url: &str) -> Option<FetchCompletion> {
        let mut state = self.state.lock();
        let index = state.pending.iter().position(|c| c.url() == url)?;
        Some(state.pending.remove(index))
    }

    /// Completes the request for `url` with `f`. Returns false if no such
    /// request is pending.
    pub fn complete<F>(&self, url: &str, f: F) -> bool
    where
        F: FnOnce(&mut Loader) -> Result<(), LoaderError> + Send + 'static,
    {
        match self.take(url) {
            Some(completion) => {
                completion.complete(Box::new(f));
                true
            }
            None => false,
        }
    }

    /// Completes the request for `url` with code that registers nothing.
    pub fn complete_empty(&self, url: &str) -> bool {
        match self.take(url) {
            Some(completion) => {
                completion.complete_empty();
                true
            }
            None => false,
        }
    }

    /// Gives up on the request for `url`.
    pub fn abandon(&self, url: &str) -> bool {
        self.take(url).is_some()
    }
}

/// Asynchronous origin of scripts for [`ThreadedFetcher`].
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Retrieves the script at `url`, or `None` if it cannot be loaded.
    async fn load(&self, url: &str) -> Option<Script>;
}

#[async_trait]
impl ScriptSource for ScriptBundle {
    async fn load(&self, url: &str) -> Option<Script> {
        let (script, latency) = self.take(url)?;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Some(script)
    }
}

/// Fetches on a tokio runtime, one task per request.
///
/// Completions travel back over the loader's channel, so they may arrive in
/// any order; the loader processes them one at a time.
///
/// The loader blocks on that channel in [`Loader::run_until_settled`], so it
/// must be driven from a thread that is not a worker of `runtime`. On a
/// `current_thread` runtime, or from inside one of its tasks, the spawned
/// fetches never get to run and the call waits until its deadline. Use
/// `tokio::task::spawn_blocking` or a plain thread when the host is async.
#[derive(Clone)]
pub struct ThreadedFetcher {
    runtime: tokio::runtime::Handle,
    source: Arc<dyn ScriptSource>,
}

impl ThreadedFetcher {
    /// Creates a fetcher spawning onto `runtime` and loading from `source`.
    pub fn new(runtime: tokio::runtime::Handle, source: Arc<dyn ScriptSource>) -> Self {
        Self { runtime, source }
    }
}

impl ScriptFetcher for ThreadedFetcher {
    fn fetch(&mut self, completion: FetchCompletion) {
        let source = Arc::clone(&self.source);
        self.runtime.spawn(async move {
            let url = completion.url().to_string();
            match source.load(&url).await {
                Some(script) => completion.complete(script),
                None => {
                    tracing::warn!(url = %url, "script source could not load url");
                }
            }
        });
    }
}

impl fmt::Debug for ThreadedFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadedFetcher").finish_non_exhaustive()
    }
}
