//! Import and export specifier erasure.
//!
//! Statements are collected while walking the module and resolved once the
//! whole file has been seen, because eliding an unused type import depends on
//! every reference in the file.

use source_edit::{EditSet, Span};

/// A specifier inside braces together with whether it is erased.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ListItem {
    pub span: Span,
    pub erase: bool,
}

/// Removes erased items from a comma-separated list, keeping the
/// separators of the items that stay.
///
/// A run of erased items is removed up to the start of the next kept item,
/// or from the end of the previous kept item when the run is at the end.
/// A list where every item is erased is left to the caller.
pub(crate) fn remove_list_items(items: &[ListItem], edits: &mut EditSet) {
    let mut i = 0;
    while i < items.len() {
        if !items[i].erase {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < items.len() && items[i].erase {
            i += 1;
        }
        let run_end = i - 1;

        if i < items.len() {
            edits.delete(Span::from_usize(items[run_start].span.lo(), items[i].span.lo()));
        } else if run_start > 0 {
            edits.delete(Span::from_usize(
                items[run_start - 1].span.hi(),
                items[run_end].span.hi(),
            ));
        }
    }
}

/// A named import specifier: `A`, `A as B`, `type A`.
#[derive(Debug, Clone)]
pub(crate) struct NamedImport {
    pub span: Span,
    pub local: String,
    pub type_only: bool,
}

/// An `import` statement awaiting resolution.
#[derive(Debug, Clone)]
pub(crate) struct ImportCandidate {
    /// The whole statement.
    pub stmt: Span,
    /// `import type ...`
    pub type_only: bool,
    /// The default or namespace binding, with its local name.
    pub binding: Option<(Span, String)>,
    pub named: Vec<NamedImport>,
}

impl ImportCandidate {
    /// Records the edits for this import and returns the local names it erased.
    ///
    /// `elidable` reports whether a local name is used only in type positions.
    pub(crate) fn resolve(
        &self,
        source: &str,
        elidable: impl Fn(&str) -> bool,
        edits: &mut EditSet,
    ) -> Vec<String> {
        if self.type_only {
            edits.delete_lines(self.stmt);
            return self
                .binding
                .iter()
                .map(|(_, local)| local.clone())
                .chain(self.named.iter().map(|spec| spec.local.clone()))
                .collect();
        }

        // `import './polyfill'` and `import {} from 'x'` stay for their side effects.
        if self.named.is_empty() {
            return Vec::new();
        }

        let items: Vec<ListItem> = self
            .named
            .iter()
            .map(|spec| ListItem {
                span: spec.span,
                erase: spec.type_only || elidable(&spec.local),
            })
            .collect();
        let erased: Vec<String> = self
            .named
            .iter()
            .zip(&items)
            .filter(|(_, item)| item.erase)
            .map(|(spec, _)| spec.local.clone())
            .collect();

        if erased.len() < items.len() {
            remove_list_items(&items, edits);
            return erased;
        }

        match &self.binding {
            None => edits.delete_lines(self.stmt),
            Some((binding, _)) => {
                // `import React, { type FC } from 'react'` keeps only the default.
                let last = items[items.len() - 1].span.hi();
                match source.get(last..self.stmt.hi()).and_then(|rest| rest.find('}')) {
                    Some(close) => {
                        edits.delete(Span::from_usize(binding.hi(), last + close + 1));
                    }
                    None => edits.delete_lines(self.stmt),
                }
            }
        }
        erased
    }
}

/// An export specifier: `A`, `A as B`, `type A`, `* as ns`.
#[derive(Debug, Clone)]
pub(crate) struct ExportItem {
    pub span: Span,
    /// The local name being exported, for plain named specifiers.
    pub local: Option<String>,
    pub type_only: bool,
}

/// An `export { ... }` statement awaiting resolution.
#[derive(Debug, Clone)]
pub(crate) struct ExportCandidate {
    pub stmt: Span,
    /// `export type { ... }`
    pub type_only: bool,
    /// `export { ... } from '...'`
    pub reexport: bool,
    pub items: Vec<ExportItem>,
}

impl ExportCandidate {
    /// Records the edits for this export. `is_type_name` reports whether a
    /// local name only exists as a type.
    pub(crate) fn resolve(&self, is_type_name: impl Fn(&str) -> bool, edits: &mut EditSet) {
        if self.type_only {
            edits.delete_lines(self.stmt);
            return;
        }
        // `export {}` marks a file as a module and is valid JavaScript.
        if self.items.is_empty() {
            return;
        }

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem {
                span: item.span,
                erase: item.type_only
                    || (!self.reexport && item.local.as_deref().is_some_and(&is_type_name)),
            })
            .collect();

        if items.iter().all(|item| item.erase) {
            edits.delete_lines(self.stmt);
        } else {
            remove_list_items(&items, edits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span_of(source: &str, needle: &str) -> Span {
        let start = source.find(needle).unwrap();
        Span::from_usize(start, start + needle.len())
    }

    fn named(source: &str, text: &str, local: &str, type_only: bool) -> NamedImport {
        NamedImport {
            span: span_of(source, text),
            local: local.to_string(),
            type_only,
        }
    }

    fn item(source: &str, text: &str, erase: bool) -> ListItem {
        ListItem {
            span: span_of(source, text),
            erase,
        }
    }

    #[test]
    fn test_remove_first_items() {
        let source = "{ type A, type B, c }";
        let mut edits = EditSet::new();
        let items = [
            item(source, "type A", true),
            item(source, "type B", true),
            item(source, "c", false),
        ];
        remove_list_items(&items, &mut edits);
        assert_eq!(edits.apply(source).code, "{ c }");
    }

    #[test]
    fn test_remove_trailing_items() {
        let source = "{ a, b, type C }";
        let mut edits = EditSet::new();
        let items = [
            item(source, "a", false),
            item(source, "b", false),
            item(source, "type C", true),
        ];
        remove_list_items(&items, &mut edits);
        assert_eq!(edits.apply(source).code, "{ a, b }");
    }

    #[test]
    fn test_mixed_import_keeps_values() {
        let source = "import { useState, type FC } from 'react';";
        let import = ImportCandidate {
            stmt: Span::from_usize(0, source.len()),
            type_only: false,
            binding: None,
            named: vec![
                named(source, "useState", "useState", false),
                named(source, "type FC", "FC", true),
            ],
        };
        let mut edits = EditSet::new();
        let erased = import.resolve(source, |_| false, &mut edits);
        assert_eq!(erased, vec!["FC".to_string()]);
        assert_eq!(edits.apply(source).code, "import { useState } from 'react';");
    }

    #[test]
    fn test_default_survives_erased_named_list() {
        let source = "import React, { type FC } from 'react';";
        let import = ImportCandidate {
            stmt: Span::from_usize(0, source.len()),
            type_only: false,
            binding: Some((span_of(source, "React"), "React".to_string())),
            named: vec![named(source, "type FC", "FC", true)],
        };
        let mut edits = EditSet::new();
        import.resolve(source, |_| false, &mut edits);
        assert_eq!(edits.apply(source).code, "import React from 'react';");
    }

    #[test]
    fn test_fully_erased_import_removes_statement() {
        let source = "import { Props } from './types';\nrun();\n";
        let stmt = span_of(source, "import { Props } from './types';");
        let import = ImportCandidate {
            stmt,
            type_only: false,
            binding: None,
            named: vec![named(source, "Props", "Props", false)],
        };
        let mut edits = EditSet::new();
        import.resolve(source, |name| name == "Props", &mut edits);
        assert_eq!(edits.apply(source).code, "run();\n");
    }

    #[test]
    fn test_side_effect_import_is_kept() {
        let source = "import './setup';";
        let import = ImportCandidate {
            stmt: Span::from_usize(0, source.len()),
            type_only: false,
            binding: None,
            named: Vec::new(),
        };
        let mut edits = EditSet::new();
        assert!(import.resolve(source, |_| true, &mut edits).is_empty());
        assert!(edits.is_empty());
    }

    #[test]
    fn test_export_of_type_names() {
        let source = "export { Props, Button };";
        let export = ExportCandidate {
            stmt: Span::from_usize(0, source.len()),
            type_only: false,
            reexport: false,
            items: vec![
                ExportItem {
                    span: span_of(source, "Props"),
                    local: Some("Props".to_string()),
                    type_only: false,
                },
                ExportItem {
                    span: span_of(source, "Button"),
                    local: Some("Button".to_string()),
                    type_only: false,
                },
            ],
        };
        let mut edits = EditSet::new();
        export.resolve(|name| name == "Props", &mut edits);
        assert_eq!(edits.apply(source).code, "export { Button };");
    }

    #[test]
    fn test_reexport_names_are_not_checked_locally() {
        let source = "export { Props } from './types';";
        let export = ExportCandidate {
            stmt: Span::from_usize(0, source.len()),
            type_only: false,
            reexport: true,
            items: vec![ExportItem {
                span: span_of(source, "Props"),
                local: Some("Props".to_string()),
                type_only: false,
            }],
        };
        let mut edits = EditSet::new();
        export.resolve(|_| true, &mut edits);
        assert!(edits.is_empty());
    }
}
