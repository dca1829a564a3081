use thiserror::Error;

/// Fatal configuration errors surfaced during evaluation.
///
/// A denial is never an error — it is a normal [`Verdict`](crate::Verdict).
/// Everything in this enum means the deployed policy itself is broken;
/// hosts should halt request processing rather than map these to a
/// per-user denial.
#[derive(Debug, Error)]
pub enum AclError {
    /// A rule failed structural validation. Evaluation stops at the
    /// offending rule; it is never skipped, since a silently dropped rule
    /// can mask an intended restriction.
    #[error("invalid rule at index {index}: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: RuleError,
    },

    /// A pcre-mode selector value failed to compile.
    #[error("invalid pattern in rule at index {index}: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: PatternError,
    },

    /// The requested action is not part of the fixed action vocabulary.
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

/// The specific structural defect found in a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("expected exactly one of 'group' or 'user'")]
    SubjectSelector,
    #[error("expected exactly one of 'namespace', 'page' or 'category'")]
    TargetSelector,
    #[error("missing 'action'")]
    MissingAction,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("missing 'operation'")]
    MissingOperation,
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("unknown mode '{0}'")]
    UnknownMode(String),
}

/// A regex selector value that failed to compile.
#[derive(Debug, Error)]
#[error("pattern '{pattern}' failed to compile: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}
