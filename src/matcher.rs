use regex::Regex;

use crate::error::PatternError;

/// Case-sensitive membership test (page paths, stripped category names).
pub fn contains(selector: &[String], candidate: &str) -> bool {
    selector.iter().any(|s| s == candidate)
}

/// Non-empty case-sensitive intersection between a selector set and a
/// candidate set.
pub fn intersects(selector: &[String], candidates: &[String]) -> bool {
    candidates.iter().any(|c| contains(selector, c))
}

/// Non-empty intersection between an already-lowercased selector set and
/// an arbitrary-case candidate set.
pub fn intersects_ci(selector: &[String], candidates: &[String]) -> bool {
    candidates
        .iter()
        .any(|c| contains(selector, &c.to_lowercase()))
}

/// Test every pattern against every candidate; true as soon as any
/// pattern matches any candidate.
///
/// Patterns are compiled as they are reached. An uncompilable pattern is
/// a fatal configuration error, never a quiet non-match — a pattern that
/// silently stops matching could turn a deny rule into a no-op.
pub fn regex_any_match(patterns: &[String], candidates: &[String]) -> Result<bool, PatternError> {
    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|source| PatternError {
            pattern: pattern.clone(),
            source,
        })?;
        if candidates.iter().any(|c| re.is_match(c)) {
            return Ok(true);
        }
    }
    Ok(false)
}
