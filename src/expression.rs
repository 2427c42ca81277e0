//! Free-variable extraction from tag expressions.
//!
//! This is a lexical heuristic, not an expression parser. A single combined
//! pattern walks the expression; string literals, member accesses and labels
//! are consumed so that only bare identifiers count as references.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

/// Names that never count as dependencies
pub const GLOBALS: [&str; 5] = ["true", "false", "undefined", "NaN", "typeof"];

lazy_static! {
    /// Alternatives are tried left to right at each position:
    /// double-quoted string, single-quoted string, member access, label, bare
    /// identifier. Only the last one is captured.
    static ref EXPRESSION_RE: Regex = Regex::new(concat!(
        r#""[^"]*""#,
        r"|'[^']*'",
        r"|\.[0-9A-Za-z_]*[a-zA-Z$_][0-9A-Za-z_]*",
        r"|[0-9A-Za-z_]*[a-zA-Z$_][0-9A-Za-z_]*:",
        r"|([0-9A-Za-z_]*[a-zA-Z$_][0-9A-Za-z_]*)",
    ))
    .unwrap();
}

/// Insertion-ordered set of identifier names read by one or more templates.
///
/// The caller owns the list and decides whether to reuse it across compiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    names: IndexSet<String>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is already present or a global.
    /// Returns whether the list changed.
    pub fn insert(&mut self, name: &str) -> bool {
        if is_global(name) || self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_owned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dependencies {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut deps = Dependencies::new();
        for name in iter {
            deps.insert(name.as_ref());
        }
        deps
    }
}

pub fn is_global(name: &str) -> bool {
    GLOBALS.contains(&name)
}

/// Records every bare identifier in `expression` that is not a global and not
/// already listed.
pub fn extract_dependencies<'d>(expression: &str, dependencies: &'d mut Dependencies) -> &'d mut Dependencies {
    for caps in EXPRESSION_RE.captures_iter(expression) {
        if let Some(reference) = caps.get(1) {
            if dependencies.insert(reference.as_str()) {
                log::trace!("new dependency `{}`", reference.as_str());
            }
        }
    }
    dependencies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(expression: &str) -> Vec<String> {
        let mut deps = Dependencies::new();
        extract_dependencies(expression, &mut deps);
        deps.to_vec()
    }

    #[test]
    fn test_member_access_is_not_a_reference() {
        assert_eq!(extract("user.name.first"), vec!["user"]);
    }

    #[test]
    fn test_string_contents_are_skipped() {
        assert_eq!(extract(r#"greet("hello world", 'x y')"#), vec!["greet"]);
    }

    #[test]
    fn test_labels_are_skipped() {
        assert_eq!(extract("{ key: value, other: more }"), vec!["value", "more"]);
    }

    #[test]
    fn test_globals_are_skipped() {
        assert_eq!(extract("typeof x === undefined || flag === true"), vec!["x", "flag"]);
    }

    #[test]
    fn test_insert_keeps_first_occurrence_order() {
        let deps: Dependencies = ["b", "a", "b", "NaN", "c"].into_iter().collect();
        assert_eq!(deps.to_vec(), vec!["b", "a", "c"]);
    }
}
