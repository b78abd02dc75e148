//! Version parsing and normalization

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Stability levels in Composer precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    Dev,
    Alpha,
    Beta,
    RC,
    Stable,
    Patch,
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Dev => "dev",
            Stability::Alpha => "alpha",
            Stability::Beta => "beta",
            Stability::RC => "RC",
            Stability::Stable => "stable",
            Stability::Patch => "patch",
        }
    }

    fn from_modifier(modifier: &str) -> Stability {
        match modifier.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Stability::Alpha,
            "b" | "beta" => Stability::Beta,
            "rc" => Stability::RC,
            "p" | "pl" | "patch" => Stability::Patch,
            _ => Stability::Stable,
        }
    }
}

impl std::fmt::Display for Stability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
pub enum VersionError {
    #[error("invalid version string \"{0}\"")]
    Invalid(String),
}

lazy_static! {
    // Release versions only; branch versions (dev-*) are rejected.
    static ref VERSION_RE: Regex = Regex::new(
        r"(?i)^v?(\d{1,9})(?:\.(\d{1,9}))?(?:\.(\d{1,9}))?(?:\.(\d{1,9}))?(?:[._-]?(stable|beta|alpha|patch|rc|pl|a|b|p)((?:[.-]?\d+)*))?([.-]?dev)?(?:\+[^\s+]+)?$"
    )
    .unwrap();
}

/// A normalized version: four numeric components, a stability level and
/// optional stability numbers (`1.0.0-beta2` carries `[2]`).
///
/// The derived ordering matches Composer's `version_compare` semantics for
/// release versions: numeric components first, then the stability ladder,
/// then the stability numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    parts: [u64; 4],
    stability: Stability,
    pre: Vec<u64>,
}

impl Version {
    /// Parse and normalize a version string.
    pub fn parse(input: &str) -> Result<Version, VersionError> {
        Self::parse_counted(input).map(|(version, _)| version)
    }

    /// Parse a version, also reporting how many numeric components were
    /// written out. Range desugaring needs the count (`~1.2` and `~1.2.0`
    /// expand differently).
    pub(crate) fn parse_counted(input: &str) -> Result<(Version, usize), VersionError> {
        let trimmed = input.trim();
        let captures = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::Invalid(input.to_string()))?;

        let mut parts = [0u64; 4];
        let mut specified = 0;
        for (slot, index) in (1..=4).enumerate() {
            if let Some(m) = captures.get(index) {
                parts[slot] = m
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::Invalid(input.to_string()))?;
                specified = slot + 1;
            }
        }

        let mut stability = captures
            .get(5)
            .map(|m| Stability::from_modifier(m.as_str()))
            .unwrap_or(Stability::Stable);

        let mut pre: Vec<u64> = captures
            .get(6)
            .map(|m| {
                m.as_str()
                    .split(['.', '-'])
                    .filter(|s| !s.is_empty())
                    .filter_map(|s| s.parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        // A trailing -dev outranks any other modifier.
        if captures.get(7).is_some() {
            stability = Stability::Dev;
            pre.clear();
        }

        Ok((
            Version {
                parts,
                stability,
                pre,
            },
            specified,
        ))
    }

    pub(crate) fn from_parts(parts: [u64; 4], stability: Stability) -> Version {
        Version {
            parts,
            stability,
            pre: Vec::new(),
        }
    }

    pub fn parts(&self) -> [u64; 4] {
        self.parts
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    /// The same version at dev stability, used for range lower bounds so
    /// that pre-releases of the low version are still allowed.
    pub(crate) fn as_dev(&self) -> Version {
        Version {
            parts: self.parts,
            stability: Stability::Dev,
            pre: Vec::new(),
        }
    }

    /// Increment the component at `index`, zeroing everything after it.
    /// The result is a dev version so it can serve as an exclusive upper
    /// bound that shuts out pre-releases of the next series.
    pub(crate) fn bumped(&self, index: usize) -> Version {
        let mut parts = [0u64; 4];
        parts[..index].copy_from_slice(&self.parts[..index]);
        parts[index] = self.parts[index] + 1;
        Version {
            parts,
            stability: Stability::Dev,
            pre: Vec::new(),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [major, minor, patch, extra] = self.parts;
        write!(f, "{}.{}.{}.{}", major, minor, patch, extra)?;
        if self.stability != Stability::Stable {
            write!(f, "-{}", self.stability)?;
            for (i, n) in self.pre.iter().enumerate() {
                if i == 0 {
                    write!(f, "{}", n)?;
                } else {
                    write!(f, ".{}", n)?;
                }
            }
        }
        Ok(())
    }
}
