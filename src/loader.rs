use std::path::Path;

use anyhow::{Context, Result};

use crate::matcher;
use crate::rule::{CheckedRule, NamespaceSelector, TargetSelector, ValueSelector};
use crate::schema::PolicyConfig;

/// Load a [`PolicyConfig`] from a YAML file on disk.
///
/// Validates every rule after deserialization so a malformed policy fails
/// at deployment time instead of on the first request.
pub fn load_policy(path: impl AsRef<Path>) -> Result<PolicyConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file: {}", path.display()))?;
    load_policy_from_str(&contents)
        .with_context(|| format!("failed to parse policy file: {}", path.display()))
}

/// Parse and validate a [`PolicyConfig`] from a YAML string.
pub fn load_policy_from_str(yaml: &str) -> Result<PolicyConfig> {
    let config: PolicyConfig =
        serde_yml::from_str(yaml).context("YAML deserialization failed")?;
    validate(&config)?;
    Ok(config)
}

/// Eager validation pass: resolve every rule once, and compile every
/// pcre pattern, so configuration defects surface at load time. The
/// evaluator re-validates lazily during each scan; this pass only moves
/// the failure earlier.
fn validate(config: &PolicyConfig) -> Result<()> {
    let Some(rules) = &config.rules else {
        return Ok(());
    };
    for (index, rule) in rules.iter().enumerate() {
        let checked = CheckedRule::resolve(rule)
            .with_context(|| format!("invalid rule at index {index}"))?;

        let patterns = match &checked.target {
            TargetSelector::Namespace(NamespaceSelector::Patterns(p)) => Some(p),
            TargetSelector::Page(ValueSelector::Patterns(p)) => Some(p),
            TargetSelector::Category(ValueSelector::Patterns(p)) => Some(p),
            _ => None,
        };
        if let Some(patterns) = patterns {
            // Matching against no candidates compiles every pattern
            // without matching anything.
            matcher::regex_any_match(patterns, &[])
                .with_context(|| format!("invalid pattern in rule at index {index}"))?;
        }
    }
    Ok(())
}
