//! Unit storage and publication.
//!
//! The registry is the single source of truth for which units exist and
//! which are Ready. It performs no dependency logic of its own.

use crate::namespace::Namespace;
use crate::resolver::is_direct_url;
use crate::unit::{Unit, UnitSnapshot};
use core_types::Value;
use std::collections::BTreeMap;

/// Table of units keyed by name, plus the namespace they publish into.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: BTreeMap<String, Unit>,
    namespace: Namespace,
}

impl UnitRegistry {
    /// Creates an empty registry with a fresh namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the unit named `name`, creating a placeholder if needed.
    pub fn get_or_create(&mut self, name: &str) -> &mut Unit {
        self.units
            .entry(name.to_string())
            .or_insert_with(|| Unit::placeholder(name))
    }

    /// Returns the unit named `name`.
    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Returns the unit named `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Unit> {
        self.units.get_mut(name)
    }

    /// Returns true if a unit named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Returns true if `name` exists and is Ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.units.get(name).is_some_and(Unit::is_ready)
    }

    /// The published value of `name`, if Ready.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.units.get(name).and_then(Unit::value)
    }

    /// Binds `value` into the namespace at the dotted path `name`.
    pub fn publish(&self, name: &str, value: Value) {
        self.namespace.bind_path(name, value);
    }

    /// Switches publication to `namespace`, keeping every unit.
    ///
    /// Values of units that are already Ready are bound into the new
    /// namespace as well.
    pub fn set_namespace(&mut self, namespace: Namespace) {
        for unit in self.units.values() {
            if let Some(value) = unit.value() {
                if !is_direct_url(unit.name()) {
                    namespace.bind_path(unit.name(), value.clone());
                }
            }
        }
        self.namespace = namespace;
    }

    /// The namespace ready units are published into.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Iterates units in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Number of known units, placeholders included.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no unit is known.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Copies every unit for introspection.
    pub fn snapshot(&self) -> BTreeMap<String, UnitSnapshot> {
        self.units
            .iter()
            .map(|(name, unit)| (name.clone(), unit.snapshot()))
            .collect()
    }
}
