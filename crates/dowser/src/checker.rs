//! Existence checking boundary
//!
//! The discovery engine never inspects the environment itself; it asks an
//! injected [`ExistenceChecker`] whether a package satisfying a constraint
//! is present. [`Inventory`] is the standard implementation: a plain
//! name-to-version map, typically filled from whatever package metadata the
//! host application has access to.

use std::collections::HashMap;

use dowser_semver::Constraint;

/// Answers "is this package, at a version satisfying this constraint,
/// present in the running environment?".
pub trait ExistenceChecker: Send + Sync {
    fn exists(&self, package: &str, constraint: &Constraint) -> bool;
}

impl<F> ExistenceChecker for F
where
    F: Fn(&str, &Constraint) -> bool + Send + Sync,
{
    fn exists(&self, package: &str, constraint: &Constraint) -> bool {
        self(package, constraint)
    }
}

/// An in-memory package inventory, one installed version per package.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    installed: HashMap<String, String>,
}

impl Inventory {
    pub fn new() -> Inventory {
        Inventory::default()
    }

    /// Record an installed package, replacing any previous version.
    pub fn insert(&mut self, package: impl Into<String>, version: impl Into<String>) {
        self.installed.insert(package.into(), version.into());
    }

    /// Builder-style variant of [`insert`](Inventory::insert).
    pub fn with(mut self, package: impl Into<String>, version: impl Into<String>) -> Inventory {
        self.insert(package, version);
        self
    }

    pub fn version_of(&self, package: &str) -> Option<&str> {
        self.installed.get(package).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

impl ExistenceChecker for Inventory {
    fn exists(&self, package: &str, constraint: &Constraint) -> bool {
        match self.installed.get(package) {
            Some(version) => constraint.allows_str(version),
            None => false,
        }
    }
}

impl<P: Into<String>, V: Into<String>> FromIterator<(P, V)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (package, version) in iter {
            inventory.insert(package, version);
        }
        inventory
    }
}
