//! Composer-compatible version constraint matching
//!
//! This crate parses version strings and constraint expressions the way
//! PHP's Composer does (caret/tilde/wildcard/hyphen ranges, `||`/`|`
//! disjunctions, stability suffixes) and answers whether a concrete version
//! satisfies a constraint. Branch versions (`dev-*`) are not supported;
//! only release versions can be matched.

mod constraint;
mod version;

pub use constraint::{Comparator, Constraint, ConstraintError, Op};
pub use version::{Stability, Version, VersionError};

/// Check if a version satisfies a constraint expression.
///
/// Returns `false` when either side fails to parse.
pub fn satisfies(version: &str, constraint: &str) -> bool {
    match Constraint::parse(constraint) {
        Ok(parsed) => parsed.allows_str(version),
        Err(_) => false,
    }
}
