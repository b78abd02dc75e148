//! Known implementations of the [`Logger`] contract

use std::sync::Arc;

use crate::checker::ExistenceChecker;
use crate::collection::CandidatesCollection;
use crate::contracts::{LogLevel, Logger, SharedLogger};
use crate::entity::Candidate;
use crate::resolver::Resolver;

/// Candidate tables for the logger contract.
pub struct Loggers;

impl Loggers {
    pub fn resolver(checker: Arc<dyn ExistenceChecker>) -> Resolver<SharedLogger> {
        Resolver::with_tables("logger", checker, Self::candidates, Self::extended)
    }

    /// Implementations that can be instantiated automatically, in priority
    /// order.
    fn candidates() -> CandidatesCollection<SharedLogger> {
        let mut candidates = CandidatesCollection::new();

        candidates.add(
            Candidate::new("log", "^0.4", || {
                Some(Arc::new(LogForwarder) as SharedLogger)
            })
            .expect("static logger candidate table"),
        );

        #[cfg(feature = "tracing")]
        candidates.add(
            Candidate::new("tracing", "^0.1", || {
                Some(Arc::new(TracingForwarder) as SharedLogger)
            })
            .expect("static logger candidate table"),
        );

        candidates
    }

    /// Implementations that are known but need manual configuration.
    fn extended() -> CandidatesCollection<SharedLogger> {
        [
            ("tracing", "^0.1"),
            ("slog", "^2.0"),
            ("log4rs", "^1.0"),
            ("fern", "^0.6 | ^0.7"),
            ("flexi_logger", "^0.29 | ^0.30"),
        ]
        .into_iter()
        .map(|(package, constraint)| {
            Candidate::unbuildable(package, constraint).expect("static logger candidate table")
        })
        .collect()
    }
}

/// Forwards to whatever logger the `log` facade is wired to.
struct LogForwarder;

impl Logger for LogForwarder {
    fn log(&self, level: LogLevel, message: &str) {
        let level = match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        };
        log::log!(level, "{}", message);
    }
}

#[cfg(feature = "tracing")]
struct TracingForwarder;

#[cfg(feature = "tracing")]
impl Logger for TracingForwarder {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Trace => tracing::trace!("{}", message),
        }
    }
}
