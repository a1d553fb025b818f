//! Directive argument parsing.
//!
//! Parses the flat `name=value name=value` syntax that follows a directive
//! name.

use std::sync::LazyLock;

use regex::Regex;

/// `name = value`, where the value is one run of non-whitespace characters.
static ARG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\s*=\s*(\S+)").unwrap());

/// Ordered name/value pairs parsed from a directive.
///
/// Values are captured literally: quote characters are part of the value.
/// Duplicate names are kept; [`get`](Self::get) returns the last one.
///
/// # Example
///
/// ```
/// use ssi_engine::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse(r#"method=Greet lang="en""#);
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get("method"), Some("Greet"));
/// assert_eq!(args.get("lang"), Some(r#""en""#));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    pairs: Vec<(String, String)>,
}

impl DirectiveArgs {
    /// Parse a raw argument string.
    ///
    /// Text that does not match the pair grammar is skipped; an input with no
    /// pairs yields an empty set.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let pairs = ARG_PATTERN
            .captures_iter(raw)
            .map(|caps| (caps[1].to_owned(), caps[2].to_owned()))
            .collect();
        Self { pairs }
    }

    /// Number of parsed pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Value of the last pair named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First pair, if any.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &str)> {
        self.pairs
            .first()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterate over pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args() {
        let args = DirectiveArgs::parse("");
        assert!(args.is_empty());
        assert_eq!(args.first(), None);
    }

    #[test]
    fn test_single_pair() {
        let args = DirectiveArgs::parse("file=header.html");
        assert_eq!(args.first(), Some(("file", "header.html")));
    }

    #[test]
    fn test_whitespace_around_equals() {
        let args = DirectiveArgs::parse("var  =   Name");
        assert_eq!(args.first(), Some(("var", "Name")));
    }

    #[test]
    fn test_quotes_are_kept() {
        let args = DirectiveArgs::parse(r#"file="footer.html""#);
        assert_eq!(args.get("file"), Some(r#""footer.html""#));
    }

    #[test]
    fn test_value_stops_at_whitespace() {
        let args = DirectiveArgs::parse(r#"title="Hello World""#);
        assert_eq!(args.get("title"), Some(r#""Hello"#));
    }

    #[test]
    fn test_order_is_preserved() {
        let args = DirectiveArgs::parse("method=Render a=1 b=2");
        let pairs: Vec<_> = args.iter().collect();
        assert_eq!(pairs, vec![("method", "Render"), ("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let args = DirectiveArgs::parse("method=First method=Second");
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("method"), Some("Second"));
    }

    #[test]
    fn test_garbage_is_skipped() {
        let args = DirectiveArgs::parse("??? = nothing here");
        assert!(args.is_empty());
    }

    #[test]
    fn test_get_nonexistent() {
        let args = DirectiveArgs::parse("foo=bar");
        assert_eq!(args.get("baz"), None);
    }
}
