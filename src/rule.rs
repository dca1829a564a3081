use tracing::warn;

use crate::error::RuleError;
use crate::schema::{NamespaceEntry, NamespaceValues, Rule, Values};

/// The rule-side action vocabulary (scalar values only; list members are
/// accepted verbatim).
const ACTION_VOCABULARY: [&str; 6] = ["read", "edit", "create", "createpage", "move", "*"];

/// How a rule's target values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Literal / enumerated matching.
    Simple,
    /// Every target value is a regular-expression source.
    Pcre,
}

/// Subject side of a resolved rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectSelector {
    /// At least one of these groups (lowercased) must appear in the
    /// subject's effective group set. Group values are never wildcards.
    Groups(Vec<String>),
    /// Scalar `"*"`: any user.
    AnyUser,
    /// The subject's name (lowercased) must be one of these. A literal
    /// `"*"` inside a list stays a literal.
    Users(Vec<String>),
}

/// Action side of a resolved rule (values lowercased).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSelector {
    /// Scalar `"*"`: any action.
    Any,
    One(String),
    /// A literal `"*"` inside a list stays a literal.
    Many(Vec<String>),
}

/// Target side of a resolved rule; exactly one dimension per rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    Namespace(NamespaceSelector),
    Page(ValueSelector),
    Category(ValueSelector),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceSelector {
    /// Scalar `"*"` in simple mode.
    Any,
    /// Matched by integer equality.
    Ids(Vec<i64>),
    /// Pcre patterns, matched against the decimal form of the id.
    Patterns(Vec<String>),
}

/// Resolved page or category values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSelector {
    /// Scalar `"*"` in simple mode.
    Any,
    /// Case-sensitive literal comparison.
    Literals(Vec<String>),
    /// Pcre patterns, compiled when the rule is matched.
    Patterns(Vec<String>),
}

/// A structurally valid rule with its duck-typed fields resolved into
/// tagged selectors, ready for matching.
#[derive(Debug, Clone)]
pub struct CheckedRule {
    pub subject: SubjectSelector,
    pub action: ActionSelector,
    pub target: TargetSelector,
    /// `true` for `permit`/`allow`, `false` for `deny`.
    pub allow: bool,
    pub mode: MatchMode,
}

impl CheckedRule {
    /// Validate a raw rule and resolve its selectors.
    ///
    /// Enforces, in order: exactly one of `group`/`user`; exactly one of
    /// `namespace`/`page`/`category`; a present `action` whose scalar
    /// form is in the fixed vocabulary; a present, recognized
    /// `operation`; and a recognized `mode` when one is given.
    ///
    /// Action *lists* are not vocabulary-checked: deployed policy files
    /// rely on that looseness, and an unknown list member can never equal
    /// a requested action, so it is inert rather than dangerous.
    pub fn resolve(rule: &Rule) -> Result<Self, RuleError> {
        // Mode first: target resolution depends on it.
        let mode = match rule.mode.as_deref() {
            None => MatchMode::Simple,
            Some(m) => match m.to_lowercase().as_str() {
                "simple" => MatchMode::Simple,
                "pcre" => MatchMode::Pcre,
                _ => return Err(RuleError::UnknownMode(m.to_string())),
            },
        };

        let subject = match (&rule.group, &rule.user) {
            (Some(groups), None) => SubjectSelector::Groups(groups.to_lowercase_vec()),
            (None, Some(users)) => match users.as_scalar() {
                Some("*") => SubjectSelector::AnyUser,
                _ => SubjectSelector::Users(users.to_lowercase_vec()),
            },
            _ => return Err(RuleError::SubjectSelector),
        };

        let target = match (&rule.namespace, &rule.page, &rule.category) {
            (Some(ns), None, None) => TargetSelector::Namespace(resolve_namespace(ns, mode)),
            (None, Some(page), None) => TargetSelector::Page(resolve_values(page, mode)),
            (None, None, Some(cat)) => TargetSelector::Category(resolve_values(cat, mode)),
            _ => return Err(RuleError::TargetSelector),
        };

        let action = match &rule.action {
            None => return Err(RuleError::MissingAction),
            Some(Values::One(a)) => {
                let a = a.to_lowercase();
                if !ACTION_VOCABULARY.contains(&a.as_str()) {
                    return Err(RuleError::UnknownAction(a));
                }
                if a == "*" {
                    ActionSelector::Any
                } else {
                    ActionSelector::One(a)
                }
            }
            Some(list) => ActionSelector::Many(list.to_lowercase_vec()),
        };

        let allow = match rule.operation.as_deref() {
            None => return Err(RuleError::MissingOperation),
            Some(op) => match op.to_lowercase().as_str() {
                "permit" | "allow" => true,
                "deny" => false,
                _ => return Err(RuleError::UnknownOperation(op.to_string())),
            },
        };

        Ok(Self {
            subject,
            action,
            target,
            allow,
            mode,
        })
    }
}

fn resolve_values(values: &Values, mode: MatchMode) -> ValueSelector {
    match mode {
        // In pcre mode every value is a regex source, including a scalar
        // "*", which fails to compile and is reported when the rule is
        // reached during a scan.
        MatchMode::Pcre => ValueSelector::Patterns(values.to_vec()),
        MatchMode::Simple => match values.as_scalar() {
            Some("*") => ValueSelector::Any,
            _ => ValueSelector::Literals(values.to_vec()),
        },
    }
}

fn resolve_namespace(ns: &NamespaceValues, mode: MatchMode) -> NamespaceSelector {
    if mode == MatchMode::Pcre {
        let patterns = match ns {
            NamespaceValues::One(id) => vec![id.to_string()],
            NamespaceValues::Text(t) => vec![t.clone()],
            NamespaceValues::Many(entries) => entries
                .iter()
                .map(|e| match e {
                    NamespaceEntry::Id(id) => id.to_string(),
                    NamespaceEntry::Text(t) => t.clone(),
                })
                .collect(),
        };
        return NamespaceSelector::Patterns(patterns);
    }

    match ns {
        NamespaceValues::One(id) => NamespaceSelector::Ids(vec![*id]),
        NamespaceValues::Text(t) if t == "*" => NamespaceSelector::Any,
        NamespaceValues::Text(t) => {
            // A scalar namespace must be an integer or "*"; anything else
            // never matches.
            warn!(value = %t, "scalar namespace selector is not an integer; rule target never matches");
            NamespaceSelector::Ids(Vec::new())
        }
        NamespaceValues::Many(entries) => {
            let mut ids = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry {
                    NamespaceEntry::Id(id) => ids.push(*id),
                    NamespaceEntry::Text(t) => match t.trim().parse::<i64>() {
                        Ok(id) => ids.push(id),
                        Err(_) => {
                            warn!(value = %t, "skipping non-integer namespace entry");
                        }
                    },
                }
            }
            NamespaceSelector::Ids(ids)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_rule() -> Rule {
        Rule {
            user: Some(Values::One("alice".into())),
            page: Some(Values::One("Sandbox".into())),
            action: Some(Values::One("read".into())),
            operation: Some("allow".into()),
            ..Rule::default()
        }
    }

    #[test]
    fn minimal_rule_resolves() {
        let checked = CheckedRule::resolve(&base_rule()).unwrap();
        assert_eq!(checked.subject, SubjectSelector::Users(vec!["alice".into()]));
        assert_eq!(checked.action, ActionSelector::One("read".into()));
        assert_eq!(
            checked.target,
            TargetSelector::Page(ValueSelector::Literals(vec!["Sandbox".into()]))
        );
        assert!(checked.allow);
        assert_eq!(checked.mode, MatchMode::Simple);
    }

    #[test]
    fn both_group_and_user_rejected() {
        let mut rule = base_rule();
        rule.group = Some(Values::One("staff".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::SubjectSelector
        );
    }

    #[test]
    fn neither_group_nor_user_rejected() {
        let mut rule = base_rule();
        rule.user = None;
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::SubjectSelector
        );
    }

    #[test]
    fn no_target_rejected() {
        let mut rule = base_rule();
        rule.page = None;
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::TargetSelector
        );
    }

    #[test]
    fn two_targets_rejected() {
        let mut rule = base_rule();
        rule.category = Some(Values::One("Foo".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::TargetSelector
        );
    }

    #[test]
    fn all_three_targets_rejected() {
        // Exactly one, not "an odd number" — a rule naming every target
        // dimension is malformed.
        let mut rule = base_rule();
        rule.namespace = Some(NamespaceValues::One(0));
        rule.category = Some(Values::One("Foo".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::TargetSelector
        );
    }

    #[test]
    fn missing_action_rejected() {
        let mut rule = base_rule();
        rule.action = None;
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::MissingAction
        );
    }

    #[test]
    fn unknown_scalar_action_rejected() {
        let mut rule = base_rule();
        rule.action = Some(Values::One("delete".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::UnknownAction("delete".into())
        );
    }

    #[test]
    fn action_list_members_not_vocabulary_checked() {
        let mut rule = base_rule();
        rule.action = Some(Values::Many(vec!["read".into(), "delete".into()]));
        let checked = CheckedRule::resolve(&rule).unwrap();
        assert_eq!(
            checked.action,
            ActionSelector::Many(vec!["read".into(), "delete".into()])
        );
    }

    #[test]
    fn scalar_wildcard_action_is_any() {
        let mut rule = base_rule();
        rule.action = Some(Values::One("*".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().action,
            ActionSelector::Any
        );
    }

    #[test]
    fn wildcard_inside_action_list_stays_literal() {
        let mut rule = base_rule();
        rule.action = Some(Values::Many(vec!["*".into()]));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().action,
            ActionSelector::Many(vec!["*".into()])
        );
    }

    #[test]
    fn missing_operation_rejected() {
        let mut rule = base_rule();
        rule.operation = None;
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::MissingOperation
        );
    }

    #[test]
    fn unknown_operation_rejected() {
        let mut rule = base_rule();
        rule.operation = Some("reject".into());
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::UnknownOperation("reject".into())
        );
    }

    #[test]
    fn permit_and_allow_are_synonyms() {
        for op in ["permit", "allow", "PERMIT", "Allow"] {
            let mut rule = base_rule();
            rule.operation = Some(op.into());
            assert!(CheckedRule::resolve(&rule).unwrap().allow, "op {op}");
        }
        let mut rule = base_rule();
        rule.operation = Some("Deny".into());
        assert!(!CheckedRule::resolve(&rule).unwrap().allow);
    }

    #[test]
    fn unknown_mode_rejected() {
        let mut rule = base_rule();
        rule.mode = Some("glob".into());
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap_err(),
            RuleError::UnknownMode("glob".into())
        );
    }

    #[test]
    fn scalar_wildcard_user_is_any_user() {
        let mut rule = base_rule();
        rule.user = Some(Values::One("*".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().subject,
            SubjectSelector::AnyUser
        );
    }

    #[test]
    fn wildcard_inside_user_list_stays_literal() {
        let mut rule = base_rule();
        rule.user = Some(Values::Many(vec!["*".into()]));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().subject,
            SubjectSelector::Users(vec!["*".into()])
        );
    }

    #[test]
    fn group_values_are_lowercased() {
        let mut rule = base_rule();
        rule.user = None;
        rule.group = Some(Values::Many(vec!["Sysop".into(), "STAFF".into()]));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().subject,
            SubjectSelector::Groups(vec!["sysop".into(), "staff".into()])
        );
    }

    #[test]
    fn pcre_mode_keeps_wildcard_as_pattern_source() {
        let mut rule = base_rule();
        rule.page = Some(Values::One("*".into()));
        rule.mode = Some("pcre".into());
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().target,
            TargetSelector::Page(ValueSelector::Patterns(vec!["*".into()]))
        );
    }

    #[test]
    fn namespace_scalar_and_wildcard() {
        let mut rule = base_rule();
        rule.page = None;
        rule.namespace = Some(NamespaceValues::One(4));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().target,
            TargetSelector::Namespace(NamespaceSelector::Ids(vec![4]))
        );

        rule.namespace = Some(NamespaceValues::Text("*".into()));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().target,
            TargetSelector::Namespace(NamespaceSelector::Any)
        );
    }

    #[test]
    fn namespace_list_parses_integer_strings_and_skips_junk() {
        let mut rule = base_rule();
        rule.page = None;
        rule.namespace = Some(NamespaceValues::Many(vec![
            NamespaceEntry::Id(4),
            NamespaceEntry::Text("6".into()),
            NamespaceEntry::Text("junk".into()),
        ]));
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().target,
            TargetSelector::Namespace(NamespaceSelector::Ids(vec![4, 6]))
        );
    }

    #[test]
    fn pcre_namespace_values_become_patterns() {
        let mut rule = base_rule();
        rule.page = None;
        rule.namespace = Some(NamespaceValues::Text("^1[0-9]$".into()));
        rule.mode = Some("pcre".into());
        assert_eq!(
            CheckedRule::resolve(&rule).unwrap().target,
            TargetSelector::Namespace(NamespaceSelector::Patterns(vec!["^1[0-9]$".into()]))
        );
    }
}
