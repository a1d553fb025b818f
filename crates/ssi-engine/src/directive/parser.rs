//! Directive syntax matching.
//!
//! Finds `<!-- #name args -->` markers in a document.

use std::sync::LazyLock;

use regex::Regex;

/// `<!-- #name args -->`. The argument string is everything up to the first
/// closing marker on the same line.
static DIRECTIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*#(\S+)\s+(.*?)\s*-->").unwrap());

/// The directives the processor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `<!-- #include file=path -->`
    Include,
    /// `<!-- #get var=Name -->` or `<!-- #get field=Name -->`
    Get,
    /// `<!-- #call method=Name -->`
    Call,
}

impl DirectiveKind {
    /// Map a directive name to its kind. Names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "include" => Some(Self::Include),
            "get" => Some(Self::Get),
            "call" => Some(Self::Call),
            _ => None,
        }
    }
}

/// A directive marker found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDirective<'a> {
    /// Directive name as written (e.g. `include`).
    pub name: &'a str,
    /// Trimmed argument string.
    pub raw_args: &'a str,
    /// Byte offset of the opening `<!--`.
    pub start: usize,
    /// Byte length of the whole marker.
    pub len: usize,
}

impl ParsedDirective<'_> {
    /// Byte offset just past the closing `-->`.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Kind of the directive, or `None` for unknown names.
    #[must_use]
    pub fn kind(&self) -> Option<DirectiveKind> {
        DirectiveKind::from_name(self.name)
    }
}

/// Lazily find all directive markers in `document`, left to right and
/// non-overlapping.
///
/// # Example
///
/// ```
/// use ssi_engine::directive::{find_directives, DirectiveKind};
///
/// let doc = "A<!-- #get var=Name -->B";
/// let found: Vec<_> = find_directives(doc).collect();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind(), Some(DirectiveKind::Get));
/// assert_eq!(found[0].raw_args, "var=Name");
/// assert_eq!(&doc[found[0].end()..], "B");
/// ```
pub fn find_directives(document: &str) -> impl Iterator<Item = ParsedDirective<'_>> {
    DIRECTIVE_PATTERN.captures_iter(document).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(ParsedDirective {
            name: caps.get(1)?.as_str(),
            raw_args: caps.get(2).map_or("", |m| m.as_str()),
            start: whole.start(),
            len: whole.len(),
        })
    })
}
