//! Candidate resolution and per-contract caching
//!
//! [`resolve_first`] is the shared engine: walk an ordered candidate list,
//! ask the existence checker about each entry, build the first match.
//! [`Resolver`] layers the per-contract state on top: the lazily built
//! candidate table, the memoized singleton and the explicit override.

use std::sync::{Arc, Mutex, PoisonError};

use crate::checker::ExistenceChecker;
use crate::collection::CandidatesCollection;
use crate::entity::Candidate;

/// Resolve a contract instance from an ordered candidate list.
///
/// The first candidate whose existence check passes is built and its result
/// returned. That result is terminal: a present-but-unbuildable candidate
/// yields `None` without falling through to later candidates. No candidate
/// passing at all is a normal outcome, not an error.
pub fn resolve_first<T: Clone>(
    contract: &str,
    collection: &CandidatesCollection<T>,
    checker: &dyn ExistenceChecker,
) -> Option<T> {
    for candidate in collection {
        log::trace!(
            "{}: checking {} ({})",
            contract,
            candidate.package(),
            candidate.constraint()
        );
        if !checker.exists(candidate.package(), candidate.constraint()) {
            continue;
        }
        return match candidate.build() {
            Some(instance) => {
                log::debug!("{}: discovered {}", contract, candidate.package());
                Some(instance)
            }
            None => {
                log::debug!(
                    "{}: {} is present but could not be built",
                    contract,
                    candidate.package()
                );
                None
            }
        };
    }
    log::debug!("{}: no implementation available", contract);
    None
}

type TableFn<T> = fn() -> CandidatesCollection<T>;

struct Slots<T> {
    candidates: Option<CandidatesCollection<T>>,
    extended: Option<CandidatesCollection<T>>,
    singleton: Option<T>,
    using: Option<T>,
}

/// Per-contract resolver: a candidate registry plus three caching tiers
/// (lazy candidate table, discovered singleton, explicit override).
///
/// All state sits behind a single lock, so a resolver can be shared across
/// threads. The lock is held while builders run; builders must not call
/// back into the same resolver.
pub struct Resolver<T> {
    contract: &'static str,
    checker: Arc<dyn ExistenceChecker>,
    defaults: TableFn<T>,
    extended_defaults: TableFn<T>,
    slots: Mutex<Slots<T>>,
}

impl<T: Clone> Resolver<T> {
    /// A resolver with no default candidate table. Candidates are supplied
    /// through [`add`](Resolver::add) or [`set`](Resolver::set).
    pub fn new(contract: &'static str, checker: Arc<dyn ExistenceChecker>) -> Resolver<T> {
        Self::with_tables(
            contract,
            checker,
            CandidatesCollection::new,
            CandidatesCollection::new,
        )
    }

    /// A resolver with a default candidate table and additional
    /// known-but-not-auto-instantiable entries for diagnostics.
    ///
    /// `defaults` is invoked once, on first access; mutations then apply to
    /// the live list. `extended_defaults` produces only the extra entries
    /// appended by [`all_candidates`](Resolver::all_candidates).
    pub fn with_tables(
        contract: &'static str,
        checker: Arc<dyn ExistenceChecker>,
        defaults: TableFn<T>,
        extended_defaults: TableFn<T>,
    ) -> Resolver<T> {
        Resolver {
            contract,
            checker,
            defaults,
            extended_defaults,
            slots: Mutex::new(Slots {
                candidates: None,
                extended: None,
                singleton: None,
                using: None,
            }),
        }
    }

    pub fn contract(&self) -> &'static str {
        self.contract
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots<T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded<'a>(&self, slots: &'a mut Slots<T>) -> &'a mut CandidatesCollection<T> {
        slots.candidates.get_or_insert_with(self.defaults)
    }

    /// Snapshot of the candidate table in priority order. The table itself
    /// is mutated through [`add`](Resolver::add), [`prefer`](Resolver::prefer)
    /// and [`set`](Resolver::set), so those edits persist across calls.
    pub fn candidates(&self) -> CandidatesCollection<T> {
        let mut slots = self.lock();
        self.loaded(&mut slots).clone()
    }

    /// Snapshot of the candidate table plus every implementation that is
    /// known but cannot be instantiated automatically. Diagnostics only;
    /// discovery never consults this list. Built once, on first access.
    pub fn all_candidates(&self) -> CandidatesCollection<T> {
        let mut slots = self.lock();
        if slots.extended.is_none() {
            let mut extended = self.loaded(&mut slots).clone();
            for extra in &(self.extended_defaults)() {
                extended.add(extra.clone());
            }
            slots.extended = Some(extended);
        }
        slots.extended.clone().unwrap_or_default()
    }

    /// Register an additional candidate with lowest priority. Clears the
    /// override and singleton so the next lookup re-resolves.
    pub fn add(&self, candidate: Candidate<T>) {
        let mut slots = self.lock();
        self.loaded(&mut slots).add(candidate);
        slots.singleton = None;
        slots.using = None;
    }

    /// Try `package` before everything else. Clears the override and
    /// singleton so the next lookup re-resolves.
    pub fn prefer(&self, package: &str) {
        let mut slots = self.lock();
        self.loaded(&mut slots).prefer(package);
        slots.singleton = None;
        slots.using = None;
    }

    /// Replace the candidate table wholesale. Clears the override and
    /// singleton so the next lookup re-resolves.
    pub fn set(&self, collection: CandidatesCollection<T>) {
        let mut slots = self.lock();
        self.loaded(&mut slots).set(collection);
        slots.singleton = None;
        slots.using = None;
    }

    /// Discover an implementation. The explicit override, when set, is
    /// returned unconditionally; otherwise resolution runs afresh on every
    /// call, so environment changes are observable without a restart.
    pub fn discover(&self) -> Option<T> {
        let mut slots = self.lock();
        if let Some(instance) = &slots.using {
            return Some(instance.clone());
        }
        let collection = self.loaded(&mut slots);
        resolve_first(self.contract, collection, self.checker.as_ref())
    }

    /// Discover once and memoize. Only a successful discovery is cached; a
    /// `None` outcome is recomputed on the next call.
    pub fn singleton(&self) -> Option<T> {
        let mut slots = self.lock();
        if let Some(instance) = &slots.using {
            return Some(instance.clone());
        }
        if slots.singleton.is_none() {
            let resolved = {
                let collection = self.loaded(&mut slots);
                resolve_first(self.contract, collection, self.checker.as_ref())
            };
            slots.singleton = resolved;
        }
        slots.singleton.clone()
    }

    /// Install (or, with `None`, clear) an explicit override. While set it
    /// short-circuits both [`discover`](Resolver::discover) and
    /// [`singleton`](Resolver::singleton) without touching any candidate.
    pub fn use_instance(&self, instance: Option<T>) {
        let mut slots = self.lock();
        slots.singleton = instance.clone();
        slots.using = instance;
    }

    /// Every candidate that currently passes its existence check, in
    /// priority order. Independent of [`discover`](Resolver::discover)'s
    /// single-result semantics.
    pub fn discoveries(&self) -> Vec<Candidate<T>> {
        let mut slots = self.lock();
        self.loaded(&mut slots)
            .iter()
            .filter(|c| self.checker.exists(c.package(), c.constraint()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    type Instance = Arc<String>;

    fn instance(name: &str) -> Instance {
        Arc::new(name.to_string())
    }

    fn installed(packages: &[&'static str]) -> Arc<dyn ExistenceChecker> {
        let packages: Vec<&'static str> = packages.to_vec();
        Arc::new(move |package: &str, _: &dowser_semver::Constraint| packages.contains(&package))
    }

    fn counting_candidate(
        package: &'static str,
        calls: &Arc<AtomicUsize>,
        result: Option<&'static str>,
    ) -> Candidate<Instance> {
        let calls = Arc::clone(calls);
        Candidate::new(package, "^1.0", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            result.map(instance)
        })
        .unwrap()
    }

    #[test]
    fn test_first_match_wins_and_later_builders_never_run() {
        let a_calls = Arc::new(AtomicUsize::new(0));
        let b_calls = Arc::new(AtomicUsize::new(0));

        let mut collection = CandidatesCollection::new();
        collection.add(counting_candidate("a", &a_calls, Some("a")));
        collection.add(counting_candidate("b", &b_calls, Some("b")));

        let checker = installed(&["a", "b"]);
        let result = resolve_first("test", &collection, checker.as_ref());
        assert_eq!(result.unwrap().as_str(), "a");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nonexistent_candidates_are_skipped() {
        let mut collection = CandidatesCollection::new();
        collection.add(Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap());
        collection.add(Candidate::new("b", "^1.0", || Some(instance("b"))).unwrap());

        let checker = installed(&["b"]);
        let result = resolve_first("test", &collection, checker.as_ref());
        assert_eq!(result.unwrap().as_str(), "b");
    }

    #[test]
    fn test_unbuildable_match_is_terminal() {
        let b_calls = Arc::new(AtomicUsize::new(0));

        let mut collection = CandidatesCollection::new();
        collection.add(Candidate::unbuildable("a", "^1.0").unwrap());
        collection.add(counting_candidate("b", &b_calls, Some("b")));

        // Both are present; the first match fails to build and resolution
        // stops there instead of falling through to b.
        let checker = installed(&["a", "b"]);
        assert!(resolve_first("test", &collection, checker.as_ref()).is_none());
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_match_is_none_not_error() {
        let mut collection = CandidatesCollection::new();
        collection.add(Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap());
        let checker = installed(&[]);
        assert!(resolve_first("test", &collection, checker.as_ref()).is_none());
    }

    #[test]
    fn test_version_constraint_is_part_of_existence() {
        let mut collection = CandidatesCollection::new();
        collection.add(Candidate::new("a", "^2.0", || Some(instance("a2"))).unwrap());

        let inventory: crate::Inventory = [("a", "1.4.0")].into_iter().collect();
        assert!(resolve_first("test", &collection, &inventory).is_none());

        let inventory: crate::Inventory = [("a", "2.4.0")].into_iter().collect();
        assert_eq!(
            resolve_first("test", &collection, &inventory)
                .unwrap()
                .as_str(),
            "a2"
        );
    }

    fn resolver_with(
        packages: &[&'static str],
        candidates: &[Candidate<Instance>],
    ) -> Resolver<Instance> {
        let resolver = Resolver::new("test", installed(packages));
        for candidate in candidates {
            resolver.add(candidate.clone());
        }
        resolver
    }

    #[test]
    fn test_singleton_is_memoized_discover_is_not() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = resolver_with(&["a"], &[counting_candidate("a", &calls, Some("a"))]);

        let first = resolver.singleton().unwrap();
        let second = resolver.singleton().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let third = resolver.discover().unwrap();
        let fourth = resolver.discover().unwrap();
        assert!(!Arc::ptr_eq(&third, &fourth));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failed_singleton_is_recomputed() {
        let available = Arc::new(AtomicBool::new(false));
        let checker_flag = Arc::clone(&available);
        let checker: Arc<dyn ExistenceChecker> = Arc::new(
            move |_: &str, _: &dowser_semver::Constraint| checker_flag.load(Ordering::SeqCst),
        );

        let resolver: Resolver<Instance> = Resolver::new("test", checker);
        resolver.add(Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap());

        assert!(resolver.singleton().is_none());

        // the package appears later; the next singleton() call must see it
        available.store(true, Ordering::SeqCst);
        assert_eq!(resolver.singleton().unwrap().as_str(), "a");
    }

    #[test]
    fn test_override_short_circuits_everything() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = resolver_with(&["a"], &[counting_candidate("a", &calls, Some("a"))]);

        let forced = instance("forced");
        resolver.use_instance(Some(Arc::clone(&forced)));

        assert!(Arc::ptr_eq(&resolver.discover().unwrap(), &forced));
        assert!(Arc::ptr_eq(&resolver.singleton().unwrap(), &forced));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // clearing the override forces re-resolution from candidates
        resolver.use_instance(None);
        assert_eq!(resolver.discover().unwrap().as_str(), "a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mutation_clears_override_and_singleton() {
        let resolver = resolver_with(
            &["a", "b"],
            &[
                Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap(),
                Candidate::new("b", "^1.0", || Some(instance("b"))).unwrap(),
            ],
        );

        resolver.use_instance(Some(instance("forced")));
        assert_eq!(resolver.singleton().unwrap().as_str(), "forced");

        resolver.prefer("b");
        assert_eq!(resolver.singleton().unwrap().as_str(), "b");

        let mut replacement = CandidatesCollection::new();
        replacement.add(Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap());
        resolver.use_instance(Some(instance("forced-again")));
        resolver.set(replacement);
        assert_eq!(resolver.singleton().unwrap().as_str(), "a");
    }

    #[test]
    fn test_preference_changes_discovery() {
        let resolver = resolver_with(
            &["a", "b"],
            &[
                Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap(),
                Candidate::new("b", "^1.0", || Some(instance("b"))).unwrap(),
            ],
        );

        assert_eq!(resolver.discover().unwrap().as_str(), "a");
        resolver.prefer("b");
        assert_eq!(resolver.discover().unwrap().as_str(), "b");
        // preferring the winner again changes nothing
        resolver.prefer("b");
        assert_eq!(resolver.discover().unwrap().as_str(), "b");
    }

    #[test]
    fn test_discoveries_lists_all_passing_candidates() {
        let resolver = resolver_with(
            &["a", "c"],
            &[
                Candidate::new("a", "^1.0", || Some(instance("a"))).unwrap(),
                Candidate::new("b", "^1.0", || Some(instance("b"))).unwrap(),
                Candidate::new("c", "^1.0", || Some(instance("c"))).unwrap(),
            ],
        );

        let discoveries = resolver.discoveries();
        let found: Vec<&str> = discoveries.iter().map(|c| c.package()).collect();
        assert_eq!(found, vec!["a", "c"]);

        let empty = resolver_with(&[], &[Candidate::unbuildable("a", "^1.0").unwrap()]);
        assert!(empty.discoveries().is_empty());
    }

    #[test]
    fn test_all_candidates_includes_unbuildable_entries() {
        static EXTRA: fn() -> CandidatesCollection<Instance> = || {
            let mut extra = CandidatesCollection::new();
            extra.add(Candidate::unbuildable("manual/only", "^3.0").unwrap());
            extra
        };
        static DEFAULTS: fn() -> CandidatesCollection<Instance> = || {
            let mut defaults = CandidatesCollection::new();
            defaults.add(Candidate::new("auto/one", "^1.0", || Some(instance("x"))).unwrap());
            defaults
        };

        let resolver = Resolver::with_tables("test", installed(&["auto/one"]), DEFAULTS, EXTRA);

        assert_eq!(resolver.candidates().len(), 1);
        let all = resolver.all_candidates();
        assert_eq!(all.len(), 2);
        assert!(all.contains_package("manual/only"));

        // discovery never consults the extended list
        assert_eq!(resolver.discover().unwrap().as_str(), "x");
    }
}
