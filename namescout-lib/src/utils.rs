//! Input expansion and validation helpers.

/// Cross raw inputs with an extension list.
///
/// Inputs that already look fully qualified (containing a dot or an
/// explicit scheme) pass through untouched. Bare base names are crossed
/// with every extension (defaulting to `com` when the list is empty).
/// Inputs that cannot serve as a base label are dropped.
pub fn expand_inputs(inputs: &[String], extensions: &[String]) -> Vec<String> {
    let mut results = Vec::new();

    for input in inputs {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.contains('.') || trimmed.contains("://") {
            results.push(trimmed.to_string());
            continue;
        }

        if !is_valid_base_name(trimmed) {
            continue;
        }
        if extensions.is_empty() {
            results.push(format!("{}.com", trimmed));
        } else {
            for extension in extensions {
                let cleaned = extension.trim().trim_start_matches('.');
                if !cleaned.is_empty() {
                    results.push(format!("{}.{}", trimmed, cleaned));
                }
            }
        }
    }

    results
}

/// Whether a bare name can serve as a domain label: at least two
/// characters, alphanumeric plus interior hyphens.
pub(crate) fn is_valid_base_name(name: &str) -> bool {
    if name.len() < 2 {
        return false;
    }
    if name.starts_with('-') || name.ends_with('-') {
        return false;
    }
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn crosses_bare_names_with_extensions() {
        let result = expand_inputs(
            &strings(&["example", "test.com"]),
            &strings(&["com", "org"]),
        );
        assert_eq!(result, strings(&["example.com", "example.org", "test.com"]));
    }

    #[test]
    fn dotted_and_schemed_inputs_pass_through() {
        let result = expand_inputs(
            &strings(&["https://example.com/x", "sub.host.io"]),
            &strings(&["net"]),
        );
        assert_eq!(result, strings(&["https://example.com/x", "sub.host.io"]));
    }

    #[test]
    fn defaults_to_com_without_extensions() {
        let result = expand_inputs(&strings(&["example"]), &[]);
        assert_eq!(result, strings(&["example.com"]));
    }

    #[test]
    fn drops_unusable_base_names() {
        let result = expand_inputs(&strings(&["", "a", "-bad", "ok"]), &strings(&["com"]));
        assert_eq!(result, strings(&["ok.com"]));
    }

    #[test]
    fn leading_dots_in_extensions_are_stripped() {
        let result = expand_inputs(&strings(&["name"]), &strings(&[".io", " .dev "]));
        assert_eq!(result, strings(&["name.io", "name.dev"]));
    }

    #[test]
    fn base_name_validation() {
        assert!(is_valid_base_name("example"));
        assert!(is_valid_base_name("my-app2"));
        assert!(!is_valid_base_name("a"));
        assert!(!is_valid_base_name("-edge"));
        assert!(!is_valid_base_name("edge-"));
        assert!(!is_valid_base_name("has.dot"));
    }
}
