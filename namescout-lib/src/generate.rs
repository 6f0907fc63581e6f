//! Candidate name generation.
//!
//! Produces base name strings from patterns and prefix/suffix permutations.
//! Output is plain strings — the engine treats them like any other raw
//! input, and extension crossing happens separately in
//! [`crate::utils::expand_inputs`].
//!
//! # Pattern syntax
//!
//! - `\w` — lowercase letter (a-z) or hyphen
//! - `\d` — digit (0-9)
//! - `?`  — any of the above
//! - `\\` — literal backslash
//! - anything else — literal

use crate::error::ScoutError;
use crate::utils::is_valid_base_name;

/// Ceiling on how many names a single pattern may expand to.
const MAX_EXPANSION: usize = 10_000;

/// One slot of a parsed pattern: a fixed character or a set of choices.
#[derive(Debug, Clone)]
enum Slot {
    Literal(char),
    Charset(Vec<char>),
}

fn word_chars() -> Vec<char> {
    let mut chars: Vec<char> = ('a'..='z').collect();
    chars.push('-');
    chars
}

fn digit_chars() -> Vec<char> {
    ('0'..='9').collect()
}

fn any_chars() -> Vec<char> {
    let mut chars = word_chars();
    chars.extend(digit_chars());
    chars
}

fn parse_pattern(pattern: &str) -> Result<Vec<Slot>, ScoutError> {
    if pattern.is_empty() {
        return Err(ScoutError::invalid_pattern(pattern, "pattern is empty"));
    }

    let mut slots = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('w') => slots.push(Slot::Charset(word_chars())),
                Some('d') => slots.push(Slot::Charset(digit_chars())),
                Some('\\') => slots.push(Slot::Literal('\\')),
                Some(other) => {
                    return Err(ScoutError::invalid_pattern(
                        pattern,
                        format!("unknown escape sequence '\\{}'", other),
                    ));
                }
                None => {
                    return Err(ScoutError::invalid_pattern(pattern, "trailing backslash"));
                }
            },
            '?' => slots.push(Slot::Charset(any_chars())),
            _ => slots.push(Slot::Literal(ch)),
        }
    }
    Ok(slots)
}

/// How many names a pattern would expand to, saturating.
pub fn estimate_pattern_count(pattern: &str) -> Result<usize, ScoutError> {
    let slots = parse_pattern(pattern)?;
    Ok(slots
        .iter()
        .map(|slot| match slot {
            Slot::Literal(_) => 1usize,
            Slot::Charset(set) => set.len(),
        })
        .fold(1usize, |total, n| total.saturating_mul(n)))
}

/// Expand a pattern into every name it denotes.
///
/// Names that would not survive as a base label (leading/trailing hyphen)
/// are filtered out of the result.
///
/// # Errors
///
/// Fails on malformed patterns and on patterns expanding past the
/// expansion ceiling.
pub fn expand_pattern(pattern: &str) -> Result<Vec<String>, ScoutError> {
    let count = estimate_pattern_count(pattern)?;
    if count > MAX_EXPANSION {
        return Err(ScoutError::invalid_pattern(
            pattern,
            format!("expands to {} names, above the {} limit", count, MAX_EXPANSION),
        ));
    }

    let slots = parse_pattern(pattern)?;
    let mut names = vec![String::new()];
    for slot in &slots {
        match slot {
            Slot::Literal(ch) => {
                for name in &mut names {
                    name.push(*ch);
                }
            }
            Slot::Charset(set) => {
                let mut next = Vec::with_capacity(names.len() * set.len());
                for name in &names {
                    for ch in set {
                        let mut grown = name.clone();
                        grown.push(*ch);
                        next.push(grown);
                    }
                }
                names = next;
            }
        }
    }

    names.retain(|name| is_valid_base_name(name));
    Ok(names)
}

/// Cross base names with prefixes and suffixes.
///
/// Every prefix and suffix is applied independently; `include_bare` keeps
/// the unmodified names in the output as well.
pub fn apply_affixes(
    names: &[String],
    prefixes: &[String],
    suffixes: &[String],
    include_bare: bool,
) -> Vec<String> {
    let mut out = Vec::new();
    for name in names {
        if include_bare || (prefixes.is_empty() && suffixes.is_empty()) {
            out.push(name.clone());
        }
        for prefix in prefixes {
            out.push(format!("{}{}", prefix, name));
        }
        for suffix in suffixes {
            out.push(format!("{}{}", name, suffix));
        }
        for prefix in prefixes {
            for suffix in suffixes {
                out.push(format!("{}{}{}", prefix, name, suffix));
            }
        }
    }
    out.retain(|name| is_valid_base_name(name));
    out.dedup();
    out
}

/// Inputs to a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Base names taken as-is
    pub keywords: Vec<String>,
    /// Patterns expanded per the module syntax
    pub patterns: Vec<String>,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    /// Keep unaffixed names alongside affixed ones
    pub include_bare: bool,
}

/// Produce candidate base names from keywords and patterns, affixed.
pub fn generate_names(options: &GenerateOptions) -> Result<Vec<String>, ScoutError> {
    let mut base: Vec<String> = options
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    for pattern in &options.patterns {
        base.extend(expand_pattern(pattern)?);
    }

    let names = apply_affixes(
        &base,
        &options.prefixes,
        &options.suffixes,
        options.include_bare || (options.prefixes.is_empty() && options.suffixes.is_empty()),
    );

    // Keep first occurrence; generation order is meaningful to callers.
    let mut seen = std::collections::HashSet::new();
    Ok(names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_digit_pattern() {
        let names = expand_pattern("app\\d").unwrap();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"app0".to_string()));
        assert!(names.contains(&"app9".to_string()));
    }

    #[test]
    fn estimates_before_expanding() {
        assert_eq!(estimate_pattern_count("app\\d\\d").unwrap(), 100);
        // 37^4 is far past the ceiling
        assert!(expand_pattern("????").is_err());
    }

    #[test]
    fn rejects_bad_escapes() {
        assert!(expand_pattern("app\\x").is_err());
        assert!(expand_pattern("app\\").is_err());
        assert!(expand_pattern("").is_err());
    }

    #[test]
    fn filters_hyphen_edges() {
        // `\w` includes '-', which is invalid at the final position.
        let names = expand_pattern("app\\w").unwrap();
        assert!(!names.iter().any(|n| n.ends_with('-')));
        assert_eq!(names.len(), 26);
    }

    #[test]
    fn affixes_cross_product() {
        let base = vec!["cloud".to_string()];
        let names = apply_affixes(
            &base,
            &["get".to_string()],
            &["ly".to_string()],
            true,
        );
        assert!(names.contains(&"cloud".to_string()));
        assert!(names.contains(&"getcloud".to_string()));
        assert!(names.contains(&"cloudly".to_string()));
        assert!(names.contains(&"getcloudly".to_string()));
    }

    #[test]
    fn generate_combines_keywords_and_patterns() {
        let options = GenerateOptions {
            keywords: vec!["Base".to_string()],
            patterns: vec!["hq\\d".to_string()],
            ..Default::default()
        };
        let names = generate_names(&options).unwrap();
        assert!(names.contains(&"base".to_string()));
        assert!(names.contains(&"hq7".to_string()));
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn generate_dedupes() {
        let options = GenerateOptions {
            keywords: vec!["dup".to_string(), "dup".to_string()],
            ..Default::default()
        };
        assert_eq!(generate_names(&options).unwrap().len(), 1);
    }
}
