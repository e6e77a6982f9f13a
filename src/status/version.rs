//! Interpreter version parsing and comparison.

use std::cmp::Ordering;

/// Strip comparison operators and keep the first comma-separated clause.
///
/// `">=3.8,<4"` becomes `"3.8"`, `"^3.10"` becomes `"3.10"`, `"3.9.*"`
/// becomes `"3.9"`.
pub fn normalize_requirement(spec: &str) -> String {
    let clause = spec.split(',').next().unwrap_or("").trim();
    let clause = clause.trim_start_matches(['>', '<', '=', '~', '^', '!', ' ']);
    let clause = clause.strip_prefix("python").unwrap_or(clause);
    let clause = clause.trim_start_matches(['-', ' ']);
    clause
        .trim_end_matches(".*")
        .trim_end_matches('*')
        .trim()
        .to_string()
}

/// Parse a dotted numeric version. Returns `None` for anything else.
pub fn parse_version(text: &str) -> Option<Vec<u64>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

/// Compare two versions, padding the shorter one with zeros.
pub fn compare_versions(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Outcome of checking the current interpreter against a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Satisfied,
    TooOld { required: String },
    Unparsable,
}

/// Check `current >= requirement`.
pub fn check_compatibility(current: &str, requirement: &str) -> Compatibility {
    let required = normalize_requirement(requirement);
    let (Some(cur), Some(req)) = (parse_version(current), parse_version(&required)) else {
        return Compatibility::Unparsable;
    };
    if compare_versions(&cur, &req) == Ordering::Less {
        Compatibility::TooOld { required }
    } else {
        Compatibility::Satisfied
    }
}
