//! Units: the nodes of the dependency graph.
//!
//! A unit is created either by its own `define` call or, earlier, as a
//! placeholder the first time another unit lists it as a dependency. Its
//! lifecycle is an explicit state machine:
//!
//! Unannounced → Pending → Initializing → Ready
//!
//! An initializer that returns an error moves the unit to Failed instead of
//! Ready. Ready and Failed are terminal.

use core_types::{InitError, LoaderError, Value};
use serde::Serialize;
use std::fmt;

/// One-shot function producing a unit's value from its dependencies' values.
///
/// The values arrive in the order the dependencies were declared.
pub type Initializer = Box<dyn FnOnce(Vec<Value>) -> Result<Value, InitError> + Send>;

/// The lifecycle state of a unit.
pub enum UnitState {
    /// Placeholder: named as a dependency, no `define` seen yet
    Unannounced,
    /// Defined, waiting on the listed dependencies
    Pending {
        /// Declared dependencies that are not Ready yet, without duplicates
        unready: Vec<String>,
        /// Initializer to run once `unready` is empty
        init: Initializer,
    },
    /// The initializer is running
    Initializing,
    /// Initialized; the published value never changes
    Ready(Value),
    /// The initializer returned an error
    Failed(LoaderError),
}

impl fmt::Debug for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitState::Unannounced => write!(f, "Unannounced"),
            UnitState::Pending { unready, .. } => {
                f.debug_struct("Pending").field("unready", unready).finish()
            }
            UnitState::Initializing => write!(f, "Initializing"),
            UnitState::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            UnitState::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
        }
    }
}

/// State of a unit without its payload, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// See [`UnitState::Unannounced`]
    Unannounced,
    /// See [`UnitState::Pending`]
    Pending,
    /// See [`UnitState::Initializing`]
    Initializing,
    /// See [`UnitState::Ready`]
    Ready,
    /// See [`UnitState::Failed`]
    Failed,
}

/// A node of the dependency graph.
#[derive(Debug)]
pub struct Unit {
    name: String,
    url: Option<String>,
    direct_url: bool,
    dependencies: Vec<String>,
    depended_by: Vec<String>,
    state: UnitState,
}

impl Unit {
    /// Creates a placeholder unit.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            direct_url: false,
            dependencies: Vec::new(),
            depended_by: Vec::new(),
            state: UnitState::Unannounced,
        }
    }

    /// The unit's dotted name (or literal URL for direct-URL units).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the unit was fetched from, if it was fetched at all.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// True if the unit was named by a literal URL.
    pub fn is_direct_url(&self) -> bool {
        self.direct_url
    }

    /// Declared dependencies, in declaration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Units that listed this one as a dependency.
    pub fn depended_by(&self) -> &[String] {
        &self.depended_by
    }

    /// Dependencies still blocking initialization.
    pub fn unready_dependencies(&self) -> &[String] {
        match &self.state {
            UnitState::Pending { unready, .. } => unready,
            _ => &[],
        }
    }

    /// The current state.
    pub fn state(&self) -> &UnitState {
        &self.state
    }

    /// The current state without payload.
    pub fn status(&self) -> UnitStatus {
        match self.state {
            UnitState::Unannounced => UnitStatus::Unannounced,
            UnitState::Pending { .. } => UnitStatus::Pending,
            UnitState::Initializing => UnitStatus::Initializing,
            UnitState::Ready(_) => UnitStatus::Ready,
            UnitState::Failed(_) => UnitStatus::Failed,
        }
    }

    /// True once the unit has a published value.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, UnitState::Ready(_))
    }

    /// True if no further transition can happen.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, UnitState::Ready(_) | UnitState::Failed(_))
    }

    /// The published value, once Ready.
    pub fn value(&self) -> Option<&Value> {
        match &self.state {
            UnitState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn set_location(&mut self, url: String, direct_url: bool) {
        self.url = Some(url);
        self.direct_url = direct_url;
    }

    /// Records `dependent` as depending on this unit. Edges are never removed.
    pub(crate) fn add_dependent(&mut self, dependent: &str) {
        if !self.depended_by.iter().any(|d| d == dependent) {
            self.depended_by.push(dependent.to_string());
        }
    }

    /// Installs a descriptor. Returns true if a pending descriptor was replaced.
    ///
    /// Must not be called on a settled unit.
    pub(crate) fn announce(
        &mut self,
        dependencies: Vec<String>,
        unready: Vec<String>,
        init: Initializer,
    ) -> bool {
        let replaced = matches!(self.state, UnitState::Pending { .. });
        self.dependencies = dependencies;
        self.state = UnitState::Pending { unready, init };
        replaced
    }

    pub(crate) fn set_unready(&mut self, remaining: Vec<String>) {
        if let UnitState::Pending { unready, .. } = &mut self.state {
            *unready = remaining;
        }
    }

    /// Moves a Pending unit to Initializing and hands out its initializer.
    pub(crate) fn begin_init(&mut self) -> Option<Initializer> {
        match std::mem::replace(&mut self.state, UnitState::Initializing) {
            UnitState::Pending { init, .. } => Some(init),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub(crate) fn finish(&mut self, value: Value) {
        self.state = UnitState::Ready(value);
    }

    pub(crate) fn fail(&mut self, error: LoaderError) {
        self.state = UnitState::Failed(error);
    }

    /// Direct-URL units become Ready when their fetch completes, unless a
    /// `define` already claimed the name. Returns true on transition.
    pub(crate) fn mark_loaded(&mut self) -> bool {
        if matches!(self.state, UnitState::Unannounced) {
            self.state = UnitState::Ready(Value::Undefined);
            true
        } else {
            false
        }
    }

    /// Captures the unit for introspection.
    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            name: self.name.clone(),
            url: self.url.clone(),
            direct_url: self.direct_url,
            status: self.status(),
            dependencies: self.dependencies.clone(),
            unready_dependencies: self.unready_dependencies().to_vec(),
            depended_by: self.depended_by.clone(),
            value: self.value().cloned(),
            error: match &self.state {
                UnitState::Failed(error) => Some(error.to_string()),
                _ => None,
            },
        }
    }
}

/// Point-in-time copy of a unit, returned by `Loader::get_all_units`.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    /// Unit name
    pub name: String,
    /// Fetch location, if fetched
    pub url: Option<String>,
    /// True for direct-URL units
    pub direct_url: bool,
    /// Lifecycle state
    pub status: UnitStatus,
    /// Declared dependencies
    pub dependencies: Vec<String>,
    /// Dependencies still blocking initialization
    pub unready_dependencies: Vec<String>,
    /// Dependents
    pub depended_by: Vec<String>,
    /// Published value, once Ready
    pub value: Option<Value>,
    /// Initializer failure, if Failed
    pub error: Option<String>,
}
