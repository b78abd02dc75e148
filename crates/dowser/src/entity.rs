//! Candidate descriptor

use std::sync::Arc;

use dowser_semver::{Constraint, ConstraintError};

/// Factory producing an instance of the target contract, or `None` when the
/// implementation cannot be built despite being nominally present.
pub type Builder<T> = Arc<dyn Fn() -> Option<T> + Send + Sync>;

/// A known implementation of a contract: package name, the version range the
/// glue code supports, and a builder.
///
/// Two candidates are equal iff package and constraint text match; the
/// builder never participates in equality, so re-registering the same
/// package/constraint pair with a different builder is a no-op in a
/// [`CandidatesCollection`](crate::CandidatesCollection).
pub struct Candidate<T> {
    package: String,
    constraint: Constraint,
    builder: Builder<T>,
}

impl<T> Candidate<T> {
    /// Create a candidate. The constraint is parsed eagerly; a malformed
    /// constraint is a bug in the registration site and surfaces here.
    pub fn new<F>(
        package: impl Into<String>,
        constraint: &str,
        builder: F,
    ) -> Result<Candidate<T>, ConstraintError>
    where
        F: Fn() -> Option<T> + Send + Sync + 'static,
    {
        Ok(Candidate {
            package: package.into(),
            constraint: Constraint::parse(constraint)?,
            builder: Arc::new(builder),
        })
    }

    /// A diagnostics-only candidate whose builder always fails. Used for
    /// implementations that are known but need manual configuration.
    pub fn unbuildable(
        package: impl Into<String>,
        constraint: &str,
    ) -> Result<Candidate<T>, ConstraintError> {
        Self::new(package, constraint, || None)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Invoke the builder.
    pub fn build(&self) -> Option<T> {
        (self.builder)()
    }
}

impl<T> Clone for Candidate<T> {
    fn clone(&self) -> Self {
        Candidate {
            package: self.package.clone(),
            constraint: self.constraint.clone(),
            builder: Arc::clone(&self.builder),
        }
    }
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.package == other.package && self.constraint == other.constraint
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> std::fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("package", &self.package)
            .field("constraint", &self.constraint.as_str())
            .finish()
    }
}
