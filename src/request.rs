use std::fmt;
use std::str::FromStr;

use crate::error::AclError;

/// The fixed action vocabulary a request can carry.
///
/// Rule-side action values are looser (a rule may list actions outside
/// this vocabulary; such entries simply never match a request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Edit,
    Create,
    CreatePage,
    Move,
}

impl Action {
    /// The lowercase wire form used for rule matching.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Edit => "edit",
            Action::Create => "create",
            Action::CreatePage => "createpage",
            Action::Move => "move",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Action::Read),
            "edit" => Ok(Action::Edit),
            "create" => Ok(Action::Create),
            "createpage" => Ok(Action::CreatePage),
            "move" => Ok(Action::Move),
            _ => Err(AclError::UnknownAction(s.to_string())),
        }
    }
}

/// The subject whose access is being decided.
///
/// `groups` is the subject's *effective* group set as resolved by the
/// host (implied groups already flattened). Name and group comparisons
/// during matching are case-insensitive.
#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub groups: Vec<String>,
}

impl Subject {
    pub fn new(
        name: impl Into<String>,
        groups: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

/// Host-resolved facts about the resource under decision.
///
/// The host's resource resolver supplies all of these; the engine never
/// looks anything up itself. `categories` must already be stripped of the
/// category-namespace prefix — see [`strip_category_prefix`].
#[derive(Debug, Clone)]
pub struct Resource {
    /// Numeric namespace id.
    pub namespace: i64,
    /// Full prefixed path, e.g. `"Talk:Sandbox"`. Compared case-sensitively.
    pub path: String,
    /// Prefix-stripped category names the resource belongs to.
    pub categories: Vec<String>,
    /// Whether the resource currently exists. A read/edit of a missing
    /// resource falls back to create/createpage evaluation.
    pub exists: bool,
    /// Host-flagged exemption (e.g. a user's own configuration pages);
    /// exempt resources bypass rule evaluation entirely.
    pub exempt: bool,
}

impl Resource {
    /// An existing, non-exempt resource with no category memberships.
    pub fn new(namespace: i64, path: impl Into<String>) -> Self {
        Self {
            namespace,
            path: path.into(),
            categories: Vec::new(),
            exists: true,
            exempt: false,
        }
    }
}

/// Strip the category-namespace prefix from a raw category key.
///
/// `category_namespace` is the localized name of the category namespace
/// (e.g. `"Category"`, or an alias that itself carries a parent prefix
/// like `"Project:Category"`). When the alias contains a colon, the raw
/// key is cut at the alias's last-colon position and then after the first
/// remaining colon; otherwise it is cut after the first colon. A key
/// without any colon is returned unchanged.
///
/// Hosts use this to satisfy the resolver contract before filling
/// [`Resource::categories`].
pub fn strip_category_prefix(raw: &str, category_namespace: &str) -> String {
    match category_namespace.rfind(':') {
        None => after_first_colon(raw).to_string(),
        Some(pos) => {
            let tail = raw.get(pos + 1..).unwrap_or("");
            after_first_colon(tail).to_string()
        }
    }
}

fn after_first_colon(s: &str) -> &str {
    s.split_once(':').map_or(s, |(_, rest)| rest)
}
