//! Discovery facade

use std::sync::Arc;

use crate::checker::ExistenceChecker;
use crate::contracts::{SharedCache, SharedClock, SharedHttpClient, SharedLogger};
use crate::implementations::{Caches, Clocks, HttpClients, Loggers};
use crate::resolver::Resolver;

/// One resolution entry point per contract.
///
/// A `Discover` owns one resolver per contract, all sharing the same
/// existence checker. It is a long-lived registry: construct one at process
/// start and pass it around (or park it in a `OnceLock`); each test can
/// build its own fresh instance instead of resetting shared state.
pub struct Discover {
    caches: Resolver<SharedCache>,
    clocks: Resolver<SharedClock>,
    http_clients: Resolver<SharedHttpClient>,
    loggers: Resolver<SharedLogger>,
}

impl Discover {
    pub fn new(checker: Arc<dyn ExistenceChecker>) -> Discover {
        Discover {
            caches: Caches::resolver(Arc::clone(&checker)),
            clocks: Clocks::resolver(Arc::clone(&checker)),
            http_clients: HttpClients::resolver(Arc::clone(&checker)),
            loggers: Loggers::resolver(checker),
        }
    }

    /// Discover a cache pool implementation.
    pub fn cache(&self) -> Option<SharedCache> {
        self.caches.discover()
    }

    /// Discover a clock implementation.
    pub fn clock(&self) -> Option<SharedClock> {
        self.clocks.discover()
    }

    /// Discover an HTTP client implementation.
    pub fn http_client(&self) -> Option<SharedHttpClient> {
        self.http_clients.discover()
    }

    /// Discover a logger implementation.
    pub fn logger(&self) -> Option<SharedLogger> {
        self.loggers.discover()
    }

    /// The cache pool resolver, for the full candidate API
    /// (`singleton`, `prefer`, `use_instance`, `discoveries`, …).
    pub fn caches(&self) -> &Resolver<SharedCache> {
        &self.caches
    }

    pub fn clocks(&self) -> &Resolver<SharedClock> {
        &self.clocks
    }

    pub fn http_clients(&self) -> &Resolver<SharedHttpClient> {
        &self.http_clients
    }

    pub fn loggers(&self) -> &Resolver<SharedLogger> {
        &self.loggers
    }
}
