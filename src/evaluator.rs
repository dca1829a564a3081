use tracing::{debug, trace};

use crate::decision::Verdict;
use crate::error::{AclError, PatternError};
use crate::matcher;
use crate::request::{Action, Resource, Subject};
use crate::rule::{
    ActionSelector, CheckedRule, NamespaceSelector, SubjectSelector, TargetSelector, ValueSelector,
};
use crate::schema::{PolicyConfig, Rule};

/// The access-control decision engine.
///
/// Owns a read-only [`PolicyConfig`]; hosts that hot-reload policy build
/// a fresh evaluator and swap it atomically. Evaluation touches no state
/// outside the call stack, so concurrent calls need no locking.
///
/// Rules are validated and their pcre patterns compiled lazily as the
/// scan reaches them. Hosts that care about per-request cost should
/// validate at deployment time via [`crate::loader`] and may cache
/// compiled patterns keyed by rule identity on their side.
pub struct Evaluator {
    config: PolicyConfig,
}

impl Evaluator {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The underlying configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decide whether `subject` may perform `action` on `resource`.
    ///
    /// Returns a [`Verdict`] for every well-formed policy. An error means
    /// the policy configuration itself is broken (malformed rule or
    /// uncompilable pattern); hosts must treat that as a deployment
    /// failure, not a per-user denial.
    pub fn evaluate(
        &self,
        subject: &Subject,
        resource: &Resource,
        action: Action,
    ) -> Result<Verdict, AclError> {
        debug!(user = %subject.name, path = %resource.path, %action, "evaluating request");

        // With no policy configured the engine imposes nothing: fail open,
        // so an ACL-free deployment behaves as if the engine were absent.
        let Some(rules) = self.config.rules.as_deref() else {
            return Ok(Verdict::Allow);
        };
        // Exempt resources (e.g. a user's own configuration pages) skip
        // rule evaluation entirely.
        if resource.exempt {
            trace!("resource is exempt");
            return Ok(Verdict::Allow);
        }
        if action == Action::Read && self.config.read_whitelist.iter().any(|p| p == &resource.path)
        {
            trace!("resource is read-whitelisted");
            return Ok(Verdict::Allow);
        }
        if self.is_superuser(subject) {
            trace!("subject is a superuser");
            return Ok(Verdict::Allow);
        }

        if let Some(verdict) = self.scan(rules, subject, resource, action)? {
            return Ok(verdict);
        }

        // A read or edit of a resource that does not exist is really a
        // question about creation: try `create`, then `createpage`. A
        // deny from the first step does not stop the second.
        if !resource.exists && matches!(action, Action::Read | Action::Edit) {
            for fallback in [Action::Create, Action::CreatePage] {
                if let Some(Verdict::Allow) = self.scan(rules, subject, resource, fallback)? {
                    trace!(%fallback, "create fallback allowed the request");
                    return Ok(Verdict::Allow);
                }
            }
        }

        // Implicit last rule: deny all.
        Ok(Verdict::deny())
    }

    fn is_superuser(&self, subject: &Subject) -> bool {
        let name = subject.name.to_lowercase();
        self.config
            .superusers
            .iter()
            .any(|s| s.to_lowercase() == name)
    }

    /// Walk the rule list in order; the first applicable rule decides.
    ///
    /// Every rule is structurally validated as it is reached — a
    /// malformed rule aborts the whole evaluation rather than being
    /// skipped, since a skipped rule can mask an intended restriction.
    fn scan(
        &self,
        rules: &[Rule],
        subject: &Subject,
        resource: &Resource,
        action: Action,
    ) -> Result<Option<Verdict>, AclError> {
        for (index, rule) in rules.iter().enumerate() {
            let checked = CheckedRule::resolve(rule)
                .map_err(|source| AclError::InvalidRule { index, source })?;
            if applies(&checked, subject, resource, action, index)? {
                trace!(rule = index, allow = checked.allow, "first applicable rule decides");
                return Ok(Some(if checked.allow {
                    Verdict::Allow
                } else {
                    Verdict::deny()
                }));
            }
        }
        Ok(None)
    }
}

/// Short-circuit conjunction of the subject, action and target
/// predicates, cheapest first.
fn applies(
    rule: &CheckedRule,
    subject: &Subject,
    resource: &Resource,
    action: Action,
    index: usize,
) -> Result<bool, AclError> {
    if !subject_applies(&rule.subject, subject) {
        return Ok(false);
    }
    if !action_applies(&rule.action, action) {
        return Ok(false);
    }
    target_applies(&rule.target, resource)
        .map_err(|source| AclError::InvalidPattern { index, source })
}

fn subject_applies(selector: &SubjectSelector, subject: &Subject) -> bool {
    match selector {
        SubjectSelector::Groups(groups) => matcher::intersects_ci(groups, &subject.groups),
        SubjectSelector::AnyUser => true,
        SubjectSelector::Users(users) => {
            let name = subject.name.to_lowercase();
            users.iter().any(|u| *u == name)
        }
    }
}

fn action_applies(selector: &ActionSelector, action: Action) -> bool {
    match selector {
        ActionSelector::Any => true,
        ActionSelector::One(a) => a == action.as_str(),
        ActionSelector::Many(list) => list.iter().any(|a| a == action.as_str()),
    }
}

fn target_applies(selector: &TargetSelector, resource: &Resource) -> Result<bool, PatternError> {
    match selector {
        TargetSelector::Namespace(ns) => match ns {
            NamespaceSelector::Any => Ok(true),
            NamespaceSelector::Ids(ids) => Ok(ids.contains(&resource.namespace)),
            NamespaceSelector::Patterns(patterns) => {
                matcher::regex_any_match(patterns, &[resource.namespace.to_string()])
            }
        },
        TargetSelector::Page(sel) => value_applies(sel, std::slice::from_ref(&resource.path)),
        TargetSelector::Category(sel) => value_applies(sel, &resource.categories),
    }
}

fn value_applies(selector: &ValueSelector, candidates: &[String]) -> Result<bool, PatternError> {
    match selector {
        ValueSelector::Any => Ok(true),
        ValueSelector::Literals(values) => Ok(matcher::intersects(values, candidates)),
        ValueSelector::Patterns(patterns) => matcher::regex_any_match(patterns, candidates),
    }
}
