use serde::{Deserialize, Serialize};

/// Top-level access-control configuration.
///
/// One explicit struct owned by the host's configuration loader; hosts
/// that hot-reload policy deserialize a fresh config and swap evaluators
/// atomically. The engine only ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Ordered policy rules; first match wins. `None` means no policy is
    /// configured at all, in which case every request is allowed — an
    /// ACL-free deployment behaves as if the engine were absent. An
    /// empty list is different: it denies everything the bypass filters
    /// let through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    /// Users exempt from all rule evaluation. Matched case-insensitively
    /// against the subject name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub superusers: Vec<String>,
    /// Full resource paths readable by anyone regardless of rules.
    /// Matched case-sensitively; applies to the read action only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_whitelist: Vec<String>,
}

/// One raw policy entry as written in the policy file.
///
/// Every field is optional at this layer: structural validation (exactly
/// one subject selector, exactly one target selector, required action and
/// operation) happens in [`CheckedRule::resolve`](crate::CheckedRule::resolve),
/// so a malformed entry survives parsing and is reported as the
/// configuration error it is rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Group name(s); the subject must belong to at least one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Values>,
    /// User name(s); scalar `"*"` matches any user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Values>,
    /// Namespace id(s), or `"*"`, or pcre pattern(s) against the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<NamespaceValues>,
    /// Full page path(s), or `"*"`, or pcre pattern(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Values>,
    /// Category name(s) (prefix-stripped), or `"*"`, or pcre pattern(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Values>,
    /// Action(s) from the vocabulary `read, edit, create, createpage,
    /// move, *`. A scalar value is vocabulary-checked; list members are
    /// accepted verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Values>,
    /// `permit` / `allow` (synonyms) or `deny`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// `simple` (default) or `pcre`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// A selector value that may be written as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    One(String),
    Many(Vec<String>),
}

impl Values {
    /// The value if written as a single string.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Values::One(v) => Some(v.as_str()),
            Values::Many(_) => None,
        }
    }

    /// All values as an owned vector.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Values::One(v) => vec![v.clone()],
            Values::Many(vs) => vs.clone(),
        }
    }

    /// All values, lowercased.
    pub fn to_lowercase_vec(&self) -> Vec<String> {
        match self {
            Values::One(v) => vec![v.to_lowercase()],
            Values::Many(vs) => vs.iter().map(|v| v.to_lowercase()).collect(),
        }
    }
}

/// A namespace selector value: a single id, a bare string (`"*"` or a
/// pcre pattern), or a list of ids and integer strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamespaceValues {
    One(i64),
    Text(String),
    Many(Vec<NamespaceEntry>),
}

/// One entry of a namespace list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamespaceEntry {
    Id(i64),
    Text(String),
}
