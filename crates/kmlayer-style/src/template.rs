//! Balloon text entity substitution
//!
//! `<BalloonStyle><text>` may reference feature properties as `$[name]`.
//! Each reference is replaced by the property value; a reference to a
//! property the feature does not have becomes the empty string and is
//! reported as a warning.

use kmlayer_common::Properties;
use kmlayer_common::warning::warn_once;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TEMPLATE_VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\[(\w+)\]").expect("valid template variable regex"));

/// Result of expanding a balloon template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Expanded text.
    pub text: String,
    /// Names of referenced properties that were missing, in order of
    /// appearance (duplicates kept).
    pub unresolved: Vec<String>,
}

/// Returns true if `text` contains at least one `$[field]` reference.
#[must_use]
pub fn contains_variables(text: &str) -> bool {
    TEMPLATE_VARIABLE_RE.is_match(text)
}

/// Expand `$[field]` references in `text` from `properties`.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn substitute_template(text: &str, properties: &Properties) -> Substitution {
    let mut unresolved = Vec::new();

    let expanded = TEMPLATE_VARIABLE_RE.replace_all(text, |caps: &Captures<'_>| {
        let variable = &caps[1];
        properties.get(variable).cloned().unwrap_or_else(|| {
            unresolved.push(variable.to_string());
            String::new()
        })
    });
    let text = expanded.into_owned();

    for variable in &unresolved {
        warn_once(
            "balloon",
            &format!("unknown template variable $[{variable}]"),
        );
    }

    Substitution { text, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_known_fields() {
        let result = substitute_template(
            "$[name] ($[kind])",
            &props(&[("name", "Lake"), ("kind", "water")]),
        );
        assert_eq!(result.text, "Lake (water)");
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_missing_field_becomes_empty() {
        let result = substitute_template("$[name] - $[missing]", &props(&[("name", "Lake")]));
        assert_eq!(result.text, "Lake - ");
        assert_eq!(result.unresolved, vec!["missing".to_string()]);
        assert!(kmlayer_common::warning::was_warned(
            "balloon",
            "unknown template variable $[missing]"
        ));
    }

    #[test]
    fn test_text_without_variables_is_unchanged() {
        let result = substitute_template("plain [text] $ here", &props(&[]));
        assert_eq!(result.text, "plain [text] $ here");
        assert!(!contains_variables("plain [text] $ here"));
        assert!(contains_variables("a $[b] c"));
    }

    #[test]
    fn test_replacement_value_is_literal() {
        // Values containing `$` must not be treated as capture references.
        let result = substitute_template("$[price]", &props(&[("price", "$1 and $name")]));
        assert_eq!(result.text, "$1 and $name");
    }
}
