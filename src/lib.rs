//! # page-acl
//!
//! A rule-based access-control decision engine for wiki-style resources.
//! Given a subject (user name plus effective groups), a resource
//! (namespace / page path / category memberships), and a requested
//! action, the engine walks an ordered policy list and returns the first
//! matching verdict, with an implicit deny when nothing matches.
//! Read/edit requests against a resource that does not exist fall back
//! to create/createpage evaluation.
//!
//! The crate is a pure, synchronous library: all host-side facts (group
//! resolution, resource metadata, denial-message rendering) are supplied
//! as inputs, and evaluation has no state beyond the call stack.
//!
//! ## Quick start
//!
//! ```rust
//! use page_acl::{loader, Action, Evaluator, Resource, Subject, Verdict};
//!
//! let config = loader::load_policy_from_str(r#"
//! rules:
//!   - group: sysop
//!     namespace: "*"
//!     action: "*"
//!     operation: allow
//!   - user: "*"
//!     page: "*"
//!     action: "*"
//!     operation: deny
//! "#).unwrap();
//!
//! let engine = Evaluator::new(config);
//! let page = Resource::new(0, "Main Page");
//!
//! let admin = Subject::new("Alice", ["sysop"]);
//! assert_eq!(engine.evaluate(&admin, &page, Action::Edit).unwrap(), Verdict::Allow);
//!
//! let visitor = Subject::new("Mallory", Vec::<String>::new());
//! assert!(matches!(
//!     engine.evaluate(&visitor, &page, Action::Edit).unwrap(),
//!     Verdict::Deny { .. }
//! ));
//! ```

mod decision;
mod error;
mod evaluator;
pub mod loader;
pub mod matcher;
mod request;
mod rule;
mod schema;

// Re-export primary public API at crate root.
pub use decision::{Verdict, DENIAL_REASON_KEY};
pub use error::{AclError, PatternError, RuleError};
pub use evaluator::Evaluator;
pub use request::{strip_category_prefix, Action, Resource, Subject};
pub use rule::{
    ActionSelector, CheckedRule, MatchMode, NamespaceSelector, SubjectSelector, TargetSelector,
    ValueSelector,
};
pub use schema::{NamespaceEntry, NamespaceValues, PolicyConfig, Rule, Values};
