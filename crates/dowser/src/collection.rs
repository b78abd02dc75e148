//! Ordered candidate registry

use crate::entity::Candidate;

/// An ordered, duplicate-aware list of candidates. Insertion order is
/// priority order: the first entry is tried first.
pub struct CandidatesCollection<T> {
    entries: Vec<Candidate<T>>,
}

impl<T> Clone for CandidatesCollection<T> {
    fn clone(&self) -> Self {
        CandidatesCollection {
            entries: self.entries.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CandidatesCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<T> CandidatesCollection<T> {
    pub fn new() -> CandidatesCollection<T> {
        CandidatesCollection {
            entries: Vec::new(),
        }
    }

    /// Append a candidate with lowest priority. Duplicates (same package and
    /// constraint) are silently ignored.
    pub fn add(&mut self, candidate: Candidate<T>) {
        if !self.entries.contains(&candidate) {
            self.entries.push(candidate);
        }
    }

    /// Move every entry for `package` to the front, keeping their relative
    /// order. No-op when the package is not registered; preference reorders
    /// known candidates, it never fabricates one.
    pub fn prefer(&mut self, package: &str) {
        if !self.entries.iter().any(|c| c.package() == package) {
            return;
        }
        let (mut preferred, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|c| c.package() == package);
        preferred.extend(rest);
        self.entries = preferred;
    }

    /// Replace the entire contents with `other`'s.
    pub fn set(&mut self, other: CandidatesCollection<T>) {
        self.entries = other.entries;
    }

    /// Iterate in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_package(&self, package: &str) -> bool {
        self.entries.iter().any(|c| c.package() == package)
    }
}

impl<T> Default for CandidatesCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a CandidatesCollection<T> {
    type Item = &'a Candidate<T>;
    type IntoIter = std::slice::Iter<'a, Candidate<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> FromIterator<Candidate<T>> for CandidatesCollection<T> {
    fn from_iter<I: IntoIterator<Item = Candidate<T>>>(iter: I) -> Self {
        let mut collection = CandidatesCollection::new();
        for candidate in iter {
            collection.add(candidate);
        }
        collection
    }
}
