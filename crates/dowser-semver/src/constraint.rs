//! Constraint parsing and matching
//!
//! A constraint expression is a disjunction (`||` or `|`) of groups, each
//! group a conjunction (whitespace or comma) of primitives: exact versions,
//! comparator-prefixed versions, caret/tilde ranges, x-ranges (`1.2.*`) and
//! hyphen ranges (`1.0 - 2.0`). Desugaring follows Composer: range lower
//! bounds drop to dev stability so pre-releases of the low version match,
//! and exclusive upper bounds are the dev form of the next series.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::version::{Stability, Version, VersionError};

/// Comparison operators for version constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Op {
    pub fn from_str(s: &str) -> Option<Op> {
        match s {
            "=" | "==" => Some(Op::Equal),
            "!=" | "<>" => Some(Op::NotEqual),
            "<" => Some(Op::LessThan),
            "<=" => Some(Op::LessThanOrEqual),
            ">" => Some(Op::GreaterThan),
            ">=" => Some(Op::GreaterThanOrEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::LessThan => "<",
            Op::LessThanOrEqual => "<=",
            Op::GreaterThan => ">",
            Op::GreaterThanOrEqual => ">=",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single operator/version pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    pub fn new(op: Op, version: Version) -> Comparator {
        Comparator { op, version }
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Op::Equal => candidate == &self.version,
            Op::NotEqual => candidate != &self.version,
            Op::LessThan => candidate < &self.version,
            Op::LessThanOrEqual => candidate <= &self.version,
            Op::GreaterThan => candidate > &self.version,
            Op::GreaterThanOrEqual => candidate >= &self.version,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConstraintError {
    #[error("empty version constraint")]
    Empty,
    #[error("could not parse version constraint \"{constraint}\": {reason}")]
    Invalid { constraint: String, reason: String },
}

lazy_static! {
    static ref OR_RE: Regex = Regex::new(r"\s*\|\|?\s*").unwrap();
    static ref HYPHEN_RE: Regex = Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap();
    static ref OP_SPACE_RE: Regex = Regex::new(r"(>=|<=|!=|<>|==|[<>=^~])\s+").unwrap();
    static ref STABILITY_FLAG_RE: Regex = Regex::new(r"(?i)@(stable|RC|beta|alpha|dev)$").unwrap();
    static ref WILDCARD_RE: Regex = Regex::new(r"(?i)^v?[x*](\.[x*])*$").unwrap();
    static ref X_RANGE_RE: Regex =
        Regex::new(r"(?i)^v?(\d{1,9})(?:\.(\d{1,9}))?(?:\.(\d{1,9}))?(?:\.[x*])+$").unwrap();
    static ref BASIC_RE: Regex = Regex::new(r"^(<>|!=|>=?|<=?|==?)(.+)$").unwrap();
}

/// A parsed constraint expression.
///
/// Keeps the raw text it was parsed from; two constraints compare equal iff
/// their raw text matches, which is what candidate deduplication keys on.
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    groups: Vec<Vec<Comparator>>,
}

impl Constraint {
    /// Parse a constraint expression.
    pub fn parse(input: &str) -> Result<Constraint, ConstraintError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ConstraintError::Empty);
        }

        let mut groups = Vec::new();
        for group in OR_RE.split(trimmed) {
            let group = group.trim();
            if group.is_empty() {
                return Err(invalid(input, "empty alternative"));
            }
            groups.push(parse_group(input, group)?);
        }

        Ok(Constraint {
            raw: trimmed.to_string(),
            groups,
        })
    }

    /// Check whether a version satisfies this constraint.
    pub fn allows(&self, version: &Version) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().all(|c| c.matches(version)))
    }

    /// Parse `version` and check it; unparseable versions never match.
    pub fn allows_str(&self, version: &str) -> bool {
        match Version::parse(version) {
            Ok(parsed) => self.allows(&parsed),
            Err(_) => false,
        }
    }

    /// The raw constraint text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Constraint {}

impl std::hash::Hash for Constraint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl std::str::FromStr for Constraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s)
    }
}

fn invalid(constraint: &str, reason: impl std::fmt::Display) -> ConstraintError {
    ConstraintError::Invalid {
        constraint: constraint.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_version(constraint: &str, text: &str) -> Result<(Version, usize), ConstraintError> {
    Version::parse_counted(text).map_err(|e: VersionError| invalid(constraint, e))
}

fn parse_group(constraint: &str, group: &str) -> Result<Vec<Comparator>, ConstraintError> {
    if let Some(captures) = HYPHEN_RE.captures(group) {
        return parse_hyphen(constraint, &captures[1], &captures[2]);
    }

    // Tolerate spaces between an operator and its version, and commas as
    // conjunctions, before splitting into primitives.
    let decommaed = group.replace(',', " ");
    let collapsed = OP_SPACE_RE.replace_all(&decommaed, "$1");

    let mut comparators = Vec::new();
    for token in collapsed.split_whitespace() {
        let token = STABILITY_FLAG_RE.replace(token, "");
        parse_primitive(constraint, &token, &mut comparators)?;
    }
    Ok(comparators)
}

fn parse_primitive(
    constraint: &str,
    token: &str,
    out: &mut Vec<Comparator>,
) -> Result<(), ConstraintError> {
    if token.is_empty() {
        return Err(invalid(constraint, "empty primitive"));
    }

    // `*` / `x.x` match everything and contribute no comparators.
    if WILDCARD_RE.is_match(token) {
        return Ok(());
    }

    if let Some(rest) = token.strip_prefix('^') {
        let (version, specified) = parse_version(constraint, rest)?;
        let parts = version.parts();
        let index = if parts[0] != 0 || specified < 2 {
            0
        } else if parts[1] != 0 || specified < 3 {
            1
        } else {
            2
        };
        push_range(version, index, out);
        return Ok(());
    }

    if let Some(rest) = token.strip_prefix("~>").or_else(|| token.strip_prefix('~')) {
        let (version, specified) = parse_version(constraint, rest)?;
        let index = if specified < 2 { 0 } else { specified - 2 };
        push_range(version, index, out);
        return Ok(());
    }

    if let Some(captures) = X_RANGE_RE.captures(token) {
        let mut parts = [0u64; 4];
        let mut specified = 0;
        for (slot, index) in (1..=3).enumerate() {
            if let Some(m) = captures.get(index) {
                parts[slot] = m
                    .as_str()
                    .parse()
                    .map_err(|_| invalid(constraint, "numeric overflow"))?;
                specified = slot + 1;
            }
        }
        let version = Version::from_parts(parts, Stability::Stable);
        push_range(version, specified - 1, out);
        return Ok(());
    }

    if let Some(captures) = BASIC_RE.captures(token) {
        let op = Op::from_str(&captures[1]).ok_or_else(|| invalid(constraint, "bad operator"))?;
        let (version, _) = parse_version(constraint, &captures[2])?;
        // A stability-less version in `<` and `>=` comparisons compares as
        // its -dev form, so `<1.2.3` rejects 1.2.3 pre-releases too.
        let version = match op {
            Op::LessThan | Op::GreaterThanOrEqual if version.stability() == Stability::Stable => {
                version.as_dev()
            }
            _ => version,
        };
        out.push(Comparator::new(op, version));
        return Ok(());
    }

    let (version, _) = parse_version(constraint, token)?;
    out.push(Comparator::new(Op::Equal, version));
    Ok(())
}

fn parse_hyphen(constraint: &str, from: &str, to: &str) -> Result<Vec<Comparator>, ConstraintError> {
    let (low, _) = parse_version(constraint, from)?;
    let low = if low.stability() == Stability::Stable {
        low.as_dev()
    } else {
        low
    };

    let (high, specified) = parse_version(constraint, to)?;
    let upper = if specified >= 3 {
        Comparator::new(Op::LessThanOrEqual, high)
    } else {
        // A partial right side is a wildcard: `1.0 - 2.0` allows 2.0.*.
        Comparator::new(Op::LessThan, high.bumped(specified - 1))
    };

    Ok(vec![
        Comparator::new(Op::GreaterThanOrEqual, low),
        upper,
    ])
}

fn push_range(version: Version, bump_index: usize, out: &mut Vec<Comparator>) {
    let low = if version.stability() == Stability::Stable {
        version.as_dev()
    } else {
        version.clone()
    };
    out.push(Comparator::new(Op::GreaterThanOrEqual, low));
    out.push(Comparator::new(Op::LessThan, version.bumped(bump_index)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satisfies;

    #[test]
    fn test_satisfies_positive() {
        // Hyphen ranges
        assert!(satisfies("1.2.3", "1.0.0 - 2.0.0"));
        assert!(satisfies("1.2.3", "1.2.3+asdf - 2.4.3+asdf"));
        assert!(satisfies("2.4.3-alpha", "1.2.3+asdf - 2.4.3+asdf"));

        // Caret
        assert!(satisfies("1.2.3", "^1.2.3+build"));
        assert!(satisfies("1.3.0", "^1.2.3+build"));
        assert!(satisfies("1.8.1", "^1.2.3"));
        assert!(satisfies("1.2.3-beta", "^1.2.3"));
        assert!(satisfies("0.1.2", "^0.1.2"));
        assert!(satisfies("0.1.2", "^0.1"));
        assert!(satisfies("1.4.2", "^1.2"));
        assert!(satisfies("1.4.2", "^1.2 ^1"));
        assert!(satisfies("0.0.1-beta", "^0.0.1-alpha"));

        // Prerelease with operators
        assert!(satisfies("1.3.0-beta", ">1.2"));
        assert!(satisfies("1.2.3-beta", "<=1.2.3"));

        // Basic constraints
        assert!(satisfies("1.0.0", "1.0.0"));
        assert!(satisfies("1.2.3", "*"));
        assert!(satisfies("v1.2.3", "*"));
        assert!(satisfies("1.2.3", "x"));

        // Comparison operators
        assert!(satisfies("1.0.0", ">=1.0.0"));
        assert!(satisfies("1.0.1", ">1.0.0"));
        assert!(satisfies("2.0.0", "<=2.0.0"));
        assert!(satisfies("1.9999.9999", "<=2.0.0"));
        assert!(satisfies("1.9999.9999", "<2.0.0"));
        assert!(satisfies("v0.1.97", ">=0.1.97"));
        assert!(satisfies("1.0.0", ">=1"));
        assert!(satisfies("1.2.8", ">1.2"));
        assert!(satisfies("1.1.1", "<1.2"));

        // Spaces between operator and version
        assert!(satisfies("1.0.0", ">= 1.0.0"));
        assert!(satisfies("1.0.1", ">=  1.0.0"));
        assert!(satisfies("1.1.0", ">   1.0.0"));
        assert!(satisfies("1.1.1", "< 1.2"));

        // comma conjunctions, with and without operator spacing
        assert!(satisfies("1.4.0", ">=1.2, <2.0"));
        assert!(satisfies("1.4.0", ">= 1.2, < 2.0"));
        assert!(satisfies("1.4.0", "~1.2, !=1.3.0"));

        // Or constraints, double and single pipe
        assert!(satisfies("1.2.4", "0.1.20 || 1.2.4"));
        assert!(satisfies("0.0.0", ">=0.2.3 || <0.0.1"));
        assert!(satisfies("0.2.3", ">=0.2.3 || <0.0.1"));
        assert!(satisfies("2.3.0", "^1.0 | ^2.0"));

        // Wildcard ranges
        assert!(satisfies("2.1.3", "2.x.x"));
        assert!(satisfies("1.2.3", "1.2.x"));
        assert!(satisfies("2.1.3", "1.2.x || 2.x"));
        assert!(satisfies("2.1.3", "2.*.*"));
        assert!(satisfies("1.2.3", "1.2.*"));
        assert!(satisfies("2.1.3", "1.2.* || 2.*"));

        // Tilde
        assert!(satisfies("2.9.0", "~2.4"));
        assert!(satisfies("2.4.5", "~2.4"));
        assert!(satisfies("1.2.3", "~1"));
        assert!(satisfies("1.4.7", "~1.0"));

        // Combined conjunctions
        assert!(satisfies("1.2.3", "~1.2.1 >=1.2.3"));
        assert!(satisfies("1.2.3", "~1.2.1 =1.2.3"));
        assert!(satisfies("1.2.3", "~1.2.1 1.2.3"));
        assert!(satisfies("1.2.3", "~1.2.1 >=1.2.3 1.2.3"));
        assert!(satisfies("1.2.3", ">=1.2.1 1.2.3"));
        assert!(satisfies("1.2.3", ">=1.2.3 >=1.2.1"));
        assert!(satisfies("1.1.0", ">1.0 <3.0 || >=4.0"));
        assert!(satisfies("4.1.0", ">1.0 <3.0 || >=4.0"));
    }

    #[test]
    fn test_satisfies_negative() {
        // Hyphen ranges
        assert!(!satisfies("2.2.3", "1.0.0 - 2.0.0"));

        // Caret
        assert!(!satisfies("2.0.0", "^1.2.3+build"));
        assert!(!satisfies("1.2.0", "^1.2.3+build"));
        assert!(!satisfies("1.2.2", "^1.2.3"));
        assert!(!satisfies("1.1.9", "^1.2"));
        assert!(!satisfies("2.0.0-alpha", "^1.2.3"));

        // Exact mismatches, including prereleases against stable
        assert!(!satisfies("1.0.1", "1.0.0"));
        assert!(!satisfies("1.0.0beta", "1"));
        assert!(!satisfies("1.1.2", "2"));
        assert!(!satisfies("2.4.1", "2.3"));

        // `<` and `>=` compare against the -dev form
        assert!(!satisfies("1.0.0beta", "<1"));
        assert!(!satisfies("1.2.3-beta", "<1.2.3"));
        assert!(!satisfies("1.0.0", "<1"));
        assert!(!satisfies("v0.1.93", ">=0.1.97"));

        // Comparison operators
        assert!(!satisfies("0.1.0", ">=1.0.0"));
        assert!(!satisfies("0.1.0", ">1.0.0"));
        assert!(!satisfies("3.0.0", "<=2.0.0"));
        assert!(!satisfies("2.9999.9999", "<=2.0.0"));
        assert!(!satisfies("2.9999.9999", "<2.0.0"));
        assert!(!satisfies("1.1.1", ">=1.2"));
        assert!(!satisfies("2.1.0", ">=1.2, <2.0"));
        assert!(!satisfies("1.3.0", "~1.2, !=1.3.0"));

        // Or constraints
        assert!(!satisfies("1.2.3", "0.1.20 || 1.2.4"));
        assert!(!satisfies("0.0.3", ">=0.2.3 || <0.0.1"));

        // Wildcard ranges
        assert!(!satisfies("1.1.3", "2.x.x"));
        assert!(!satisfies("3.1.3", "2.x.x"));
        assert!(!satisfies("1.3.3", "1.2.x"));
        assert!(!satisfies("3.1.3", "1.2.x || 2.x"));
        assert!(!satisfies("1.3.3", "1.2.*"));

        // Tilde
        assert!(!satisfies("3.0.0", "~2.4"));
        assert!(!satisfies("2.3.9", "~2.4"));
        assert!(!satisfies("0.2.3", "~1"));
        assert!(!satisfies("0.5.4-alpha", "~v0.5.4-beta"));
    }

    #[test]
    fn test_malformed_constraints() {
        assert!(matches!(Constraint::parse(""), Err(ConstraintError::Empty)));
        assert!(matches!(
            Constraint::parse("   "),
            Err(ConstraintError::Empty)
        ));
        assert!(Constraint::parse("^").is_err());
        assert!(Constraint::parse("nonsense").is_err());
        assert!(Constraint::parse("^1.0 ||").is_err());
        assert!(Constraint::parse(">=dev-master").is_err());

        let err = Constraint::parse("^oops").unwrap_err();
        assert!(err.to_string().contains("^oops"));
    }

    #[test]
    fn test_constraint_equality_is_textual() {
        let a = Constraint::parse("^1.0").unwrap();
        let b = Constraint::parse("^1.0").unwrap();
        let c = Constraint::parse(">=1.0.0-dev <2.0.0-dev").unwrap();
        assert_eq!(a, b);
        // semantically identical, textually different
        assert_ne!(a, c);
    }

    #[test]
    fn test_stability_flags_are_ignored() {
        assert!(satisfies("1.2.3", "^1.0@dev"));
        assert!(satisfies("1.2.3", "1.2.3@beta"));
    }

    #[test]
    fn test_allows_parsed_version() {
        let constraint = Constraint::parse("^1.2").unwrap();
        let version = Version::parse("1.4.0").unwrap();
        assert!(constraint.allows(&version));
        assert!(constraint.allows_str("1.9.9"));
        assert!(!constraint.allows_str("2.0.0"));
        assert!(!constraint.allows_str("garbage"));
    }
}
