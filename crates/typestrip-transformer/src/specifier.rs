//! Module specifier extension rewriting.

use crate::ExtensionMap;
use source_edit::{Edit, Span};

/// Returns true for specifiers that point into the project rather than a package.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Builds the edit that rewrites a quoted specifier's typed extension.
///
/// `literal_start` is the offset of the opening quote and `literal` the
/// full quoted text. Bare package specifiers and unquoted text are left alone.
pub(crate) fn rewrite_literal(
    literal_start: usize,
    literal: &str,
    map: &ExtensionMap,
) -> Option<Edit> {
    let quote = literal.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') || literal.len() < 2 || !literal.ends_with(quote) {
        return None;
    }
    let inner = &literal[1..literal.len() - 1];
    if !is_relative_specifier(inner) {
        return None;
    }
    let (ext_start, untyped) = map.match_suffix(inner)?;
    let start = literal_start + 1 + ext_start;
    let end = literal_start + 1 + inner.len();
    Some(Edit::replace(Span::from_usize(start, end), untyped))
}
