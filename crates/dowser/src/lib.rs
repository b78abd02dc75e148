//! Runtime discovery of well-known service contract implementations
//!
//! Given an abstract contract (a cache pool, a logger, an HTTP client, …)
//! and a prioritized registry of known candidate packages, each guarded by
//! a version constraint, `dowser` picks the highest-priority candidate that
//! is present in the environment, builds it, and caches the result. How
//! "present" is determined is injected through an [`ExistenceChecker`];
//! [`Inventory`] is the standard map-backed implementation.
//!
//! ```
//! use std::sync::Arc;
//! use dowser::{Discover, Inventory};
//!
//! let inventory: Inventory = [("log", "0.4.27")].into_iter().collect();
//! let discover = Discover::new(Arc::new(inventory));
//!
//! assert!(discover.logger().is_some());
//! assert!(discover.cache().is_none()); // absence is a normal outcome
//! ```
//!
//! The core is generic: [`Resolver`] works for any contract, and custom
//! contracts plug in by constructing one with their own candidate tables.

pub mod checker;
pub mod collection;
pub mod contracts;
pub mod discover;
pub mod entity;
pub mod implementations;
pub mod resolver;

pub use checker::{ExistenceChecker, Inventory};
pub use collection::CandidatesCollection;
pub use contracts::{
    CachePool, Clock, HttpClient, HttpError, HttpResponse, LogLevel, Logger, SharedCache,
    SharedClock, SharedHttpClient, SharedLogger,
};
pub use discover::Discover;
pub use entity::{Builder, Candidate};
pub use implementations::{Caches, Clocks, HttpClients, Loggers};
pub use resolver::{resolve_first, Resolver};

pub use dowser_semver::{Constraint, ConstraintError};
