//! Known implementations of the [`Clock`] contract

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::checker::ExistenceChecker;
use crate::collection::CandidatesCollection;
use crate::contracts::{Clock, SharedClock};
use crate::entity::Candidate;
use crate::resolver::Resolver;

/// Candidate tables for the clock contract.
pub struct Clocks;

impl Clocks {
    pub fn resolver(checker: Arc<dyn ExistenceChecker>) -> Resolver<SharedClock> {
        Resolver::with_tables("clock", checker, Self::candidates, Self::extended)
    }

    fn candidates() -> CandidatesCollection<SharedClock> {
        let mut candidates = CandidatesCollection::new();
        candidates.add(
            Candidate::new("chrono", "^0.4", || {
                Some(Arc::new(SystemClock) as SharedClock)
            })
            .expect("static clock candidate table"),
        );
        candidates
    }

    fn extended() -> CandidatesCollection<SharedClock> {
        [("time", "^0.3"), ("jiff", "^0.1 | ^0.2")]
            .into_iter()
            .map(|(package, constraint)| {
                Candidate::unbuildable(package, constraint).expect("static clock candidate table")
            })
            .collect()
    }
}

/// The system clock, read through chrono.
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
