//! Known implementations of the [`CachePool`] contract

use std::sync::Arc;

use crate::checker::ExistenceChecker;
use crate::collection::CandidatesCollection;
use crate::contracts::SharedCache;
use crate::entity::Candidate;
use crate::resolver::Resolver;

#[cfg(feature = "sled")]
use crate::contracts::CachePool;

/// Candidate tables for the cache pool contract.
pub struct Caches;

impl Caches {
    pub fn resolver(checker: Arc<dyn ExistenceChecker>) -> Resolver<SharedCache> {
        Resolver::with_tables("cache", checker, Self::candidates, Self::extended)
    }

    fn candidates() -> CandidatesCollection<SharedCache> {
        #[allow(unused_mut)]
        let mut candidates = CandidatesCollection::new();

        #[cfg(feature = "sled")]
        candidates.add(
            Candidate::new("sled", "^0.34", || {
                sled::Config::new()
                    .temporary(true)
                    .open()
                    .ok()
                    .map(|db| Arc::new(SledCache { db }) as SharedCache)
            })
            .expect("static cache candidate table"),
        );

        candidates
    }

    fn extended() -> CandidatesCollection<SharedCache> {
        [
            ("sled", "^0.34"),
            ("moka", "^0.12"),
            ("quick_cache", "^0.6"),
            ("lru", "^0.12 | ^0.13 | ^0.14"),
            ("redis", "^0.27 | ^0.28 | ^0.29"),
        ]
        .into_iter()
        .map(|(package, constraint)| {
            Candidate::unbuildable(package, constraint).expect("static cache candidate table")
        })
        .collect()
    }
}

/// A sled-backed pool over a temporary database. Builds only when the
/// backing store can actually be opened.
#[cfg(feature = "sled")]
struct SledCache {
    db: sled::Db,
}

#[cfg(feature = "sled")]
impl CachePool for SledCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.db.get(key).ok().flatten().map(|value| value.to_vec())
    }

    fn put(&self, key: &str, value: &[u8]) -> bool {
        self.db.insert(key, value).is_ok()
    }

    fn delete(&self, key: &str) -> bool {
        self.db.remove(key).ok().flatten().is_some()
    }

    fn clear(&self) -> bool {
        self.db.clear().is_ok()
    }

    fn contains(&self, key: &str) -> bool {
        self.db.contains_key(key).unwrap_or(false)
    }
}
