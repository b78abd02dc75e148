//! Per-contract candidate tables and adapter glue
//!
//! One module per contract. Each supplies the hardcoded, priority-ordered
//! table of known implementations and the compiled adapters for those that
//! can be instantiated automatically. Adapters for optional dependencies
//! sit behind a cargo feature named after the dependency; everything else
//! is listed for diagnostics only.

mod caches;
mod clocks;
mod http_clients;
mod loggers;

pub use caches::Caches;
pub use clocks::Clocks;
pub use http_clients::HttpClients;
pub use loggers::Loggers;
