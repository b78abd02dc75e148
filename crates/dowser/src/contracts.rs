//! Abstract contracts the discovery layer can resolve
//!
//! These are the minimal capability surfaces discovery promises about a
//! resolved instance. The engine itself never calls any of these methods;
//! it only hands out `Arc<dyn …>` instances built by candidate glue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A byte-oriented key/value cache pool.
pub trait CachePool: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    /// Store a value; returns false when the backend rejected the write.
    fn put(&self, key: &str, value: &[u8]) -> bool;
    fn delete(&self, key: &str) -> bool;
    fn clear(&self) -> bool;
    fn contains(&self, key: &str) -> bool;
}

/// A source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Severity levels for the logger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// A message sink.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// A response with the body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A minimal blocking HTTP client.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}

pub type SharedCache = Arc<dyn CachePool>;
pub type SharedClock = Arc<dyn Clock>;
pub type SharedHttpClient = Arc<dyn HttpClient>;
pub type SharedLogger = Arc<dyn Logger>;
