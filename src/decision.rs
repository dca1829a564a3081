/// Message key attached to every denial.
///
/// The engine never interprets this value; the host resolves it to a
/// user-facing message in whatever localization system it uses.
pub const DENIAL_REASON_KEY: &str = "page-acl-denied";

/// The outcome of evaluating one request against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The request is allowed. Carries no reason.
    Allow,
    /// The request is denied. `reason` is an opaque message key.
    Deny { reason: String },
}

impl Verdict {
    /// A denial carrying the default reason key.
    pub fn deny() -> Self {
        Verdict::Deny {
            reason: DENIAL_REASON_KEY.to_string(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}
