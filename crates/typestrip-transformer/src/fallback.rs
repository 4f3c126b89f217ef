//! Lexical stripping for input the parser rejects.
//!
//! Only statement-level constructs are handled: interfaces, type aliases,
//! ambient declarations, type-only imports and exports, and module
//! specifier extensions. The rules run over the token stream from
//! [`crate::lexer`], so keywords inside strings, templates and comments are
//! never matched. Inline annotations are left alone because without a tree
//! a `:` cannot be told apart from a ternary or an object literal.

use crate::imports::{remove_list_items, ListItem};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::specifier;
use crate::ExtensionMap;
use source_edit::{EditSet, Span};

/// Words after `declare` that start an ambient declaration.
const AMBIENT_KEYWORDS: &[&str] = &[
    "const",
    "let",
    "var",
    "function",
    "class",
    "abstract",
    "enum",
    "module",
    "namespace",
    "global",
    "type",
    "interface",
];

/// Tokenizes `source` and returns the edits for the statement-level rules.
pub(crate) fn strip_lexically(source: &str, extension_map: &ExtensionMap) -> EditSet {
    let tokens: Vec<Token> = Lexer::new(source).collect();
    let mut stripper = LexicalStripper {
        source,
        tokens: &tokens,
        extension_map,
        edits: EditSet::new(),
    };
    stripper.run();
    stripper.edits
}

struct LexicalStripper<'a> {
    source: &'a str,
    tokens: &'a [Token],
    extension_map: &'a ExtensionMap,
    edits: EditSet,
}

impl<'a> LexicalStripper<'a> {
    fn run(&mut self) {
        let mut i = 0;
        let mut statement_start = true;

        while i < self.tokens.len() {
            let token = self.tokens[i];
            if token.line_break_before {
                statement_start = true;
            }
            let after_dot = i > 0 && self.tokens[i - 1].kind == TokenKind::Dot;
            if statement_start && !after_dot {
                if let Some(next) = self.try_statement(i) {
                    i = next;
                    continue;
                }
            }
            let loads_module = matches!(token.kind, TokenKind::From | TokenKind::Import)
                || (token.kind == TokenKind::Ident && self.text(i) == "require");
            if loads_module && !after_dot {
                self.rewrite_specifier_after(i);
            }
            statement_start = matches!(
                token.kind,
                TokenKind::Semi | TokenKind::LBrace | TokenKind::RBrace
            );
            i += 1;
        }
    }

    /// Removes a type-level statement starting at token `i`. Returns the
    /// index to resume from, or `None` if nothing was removed.
    fn try_statement(&mut self, i: usize) -> Option<usize> {
        match self.kind(i)? {
            TokenKind::Export => match self.kind(i + 1)? {
                TokenKind::LBrace => {
                    self.split_braced_list(i, None, i + 1);
                    None
                }
                TokenKind::Type => match self.kind(i + 2) {
                    Some(TokenKind::LBrace | TokenKind::Star) => self.remove_statement(i, false),
                    _ if self.is_alias_at(i + 1) => self.remove_statement(i, true),
                    _ => None,
                },
                TokenKind::Interface if self.is_interface_at(i + 1) => {
                    self.remove_braced(i, i + 1)
                }
                TokenKind::Declare if self.is_ambient_at(i + 1) => self.remove_statement(i, false),
                TokenKind::Default if self.is_interface_at(i + 2) => self.remove_braced(i, i + 2),
                _ => None,
            },
            TokenKind::Import => {
                let binding = i + 1;
                match self.kind(binding)? {
                    kind if kind.is_word() => {
                        let after = binding + 1;
                        let next = self.kind(after);
                        // `import type from './x'` binds a default named `type`.
                        if kind == TokenKind::Type
                            && !matches!(next, Some(TokenKind::Comma | TokenKind::From))
                        {
                            return self.remove_statement(i, false);
                        }
                        if next == Some(TokenKind::Comma)
                            && self.kind(after + 1) == Some(TokenKind::LBrace)
                        {
                            let binding_end = self.tokens[binding].span.hi();
                            self.split_braced_list(i, Some(binding_end), after + 1);
                        }
                    }
                    TokenKind::LBrace => self.split_braced_list(i, None, binding),
                    _ => {}
                }
                None
            }
            TokenKind::Interface if self.is_interface_at(i) => self.remove_braced(i, i),
            TokenKind::Type if self.is_alias_at(i) => self.remove_statement(i, true),
            TokenKind::Declare if self.is_ambient_at(i) => self.remove_statement(i, false),
            _ => None,
        }
    }

    /// `interface Name`.
    fn is_interface_at(&self, i: usize) -> bool {
        self.kind(i) == Some(TokenKind::Interface) && self.is_word_at(i + 1)
    }

    /// `type Name =` or `type Name<`.
    fn is_alias_at(&self, i: usize) -> bool {
        self.kind(i) == Some(TokenKind::Type)
            && self.is_word_at(i + 1)
            && matches!(self.kind(i + 2), Some(TokenKind::Eq | TokenKind::LAngle))
    }

    /// `declare` followed by a declaration keyword.
    fn is_ambient_at(&self, i: usize) -> bool {
        self.kind(i) == Some(TokenKind::Declare)
            && self.is_word_at(i + 1)
            && AMBIENT_KEYWORDS.contains(&self.text(i + 1))
    }

    fn remove_statement(&mut self, start: usize, track_angles: bool) -> Option<usize> {
        let end = self.statement_end(start, track_angles);
        self.delete_tokens(start, end);
        Some(end)
    }

    /// Removes a statement whose body is the first top-level `{ ... }` at or
    /// after token `from`, plus a `;` on the same line.
    fn remove_braced(&mut self, start: usize, from: usize) -> Option<usize> {
        let open = self.find_top_level(from, TokenKind::LBrace)?;
        let mut end = self.matching(open)? + 1;
        if let Some(semi) = self.tokens.get(end) {
            if semi.kind == TokenKind::Semi && !semi.line_break_before {
                end += 1;
            }
        }
        self.delete_tokens(start, end);
        Some(end)
    }

    /// Erases `type`-tagged items from an import or export brace list.
    fn split_braced_list(&mut self, stmt_start: usize, default_end: Option<usize>, open: usize) {
        let Some(close) = self.matching(open) else {
            return;
        };

        let mut items = Vec::new();
        let mut seg_start = open + 1;
        for j in open + 1..=close {
            if j < close && self.tokens[j].kind != TokenKind::Comma {
                continue;
            }
            if seg_start < j {
                let span = Span::from_usize(
                    self.tokens[seg_start].span.lo(),
                    self.tokens[j - 1].span.hi(),
                );
                let text = span.slice(self.source).unwrap_or_default();
                items.push(ListItem {
                    span,
                    erase: is_type_specifier(text),
                });
            }
            seg_start = j + 1;
        }

        if items.is_empty() || !items.iter().any(|item| item.erase) {
            return;
        }
        if items.iter().all(|item| item.erase) {
            match default_end {
                Some(binding_end) => {
                    let close_end = self.tokens[close].span.hi();
                    self.edits.delete(Span::from_usize(binding_end, close_end));
                }
                None => {
                    let end = self.statement_end(stmt_start, false);
                    self.delete_tokens(stmt_start, end);
                }
            }
        } else {
            remove_list_items(&items, &mut self.edits);
        }
    }

    /// Rewrites the string literal after `from`, `import(` or `require(`.
    fn rewrite_specifier_after(&mut self, i: usize) {
        let mut at = i + 1;
        if self.kind(at) == Some(TokenKind::LParen) {
            at += 1;
        }
        if self.kind(at) != Some(TokenKind::Str) {
            return;
        }
        let offset = self.tokens[at].span.lo();
        let literal = self.text(at);
        if let Some(edit) = specifier::rewrite_literal(offset, literal, self.extension_map) {
            self.edits.push(edit);
        }
    }

    /// Index just past the statement starting at token `start`: through a
    /// `;` at nesting depth zero, or up to a line break there that does not
    /// continue the statement.
    fn statement_end(&self, start: usize, track_angles: bool) -> usize {
        let mut depth = 0i32;
        for j in start..self.tokens.len() {
            let token = self.tokens[j];
            if j > start && token.line_break_before && depth <= 0 {
                let prev = self.tokens[j - 1].kind;
                if !continues_after(prev) && !self.continues_before(j) {
                    return j;
                }
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::LAngle if track_angles => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                TokenKind::RAngle if track_angles => depth -= 1,
                TokenKind::Semi if depth <= 0 => return j + 1,
                _ => {}
            }
            if depth < 0 {
                return j;
            }
        }
        self.tokens.len()
    }

    /// True if token `i`, first on its line, continues the statement above.
    fn continues_before(&self, i: usize) -> bool {
        match self.kind(i) {
            Some(
                TokenKind::Pipe
                | TokenKind::Amp
                | TokenKind::Dot
                | TokenKind::Eq
                | TokenKind::Arrow
                | TokenKind::Question
                | TokenKind::Colon
                | TokenKind::LBrace
                | TokenKind::RAngle
                | TokenKind::Operator
                | TokenKind::From,
            ) => true,
            Some(TokenKind::Ident) => matches!(self.text(i), "extends" | "implements"),
            _ => false,
        }
    }

    /// First `target` at or after token `from` outside angle brackets.
    fn find_top_level(&self, from: usize, target: TokenKind) -> Option<usize> {
        let mut angles = 0i32;
        for j in from..self.tokens.len() {
            match self.tokens[j].kind {
                TokenKind::LAngle => angles += 1,
                TokenKind::RAngle if angles > 0 => angles -= 1,
                kind if kind == target && angles == 0 => return Some(j),
                _ => {}
            }
        }
        None
    }

    /// Index of the bracket closing the one at `open`.
    fn matching(&self, open: usize) -> Option<usize> {
        let (opening, closing) = match self.kind(open)? {
            TokenKind::LBrace => (TokenKind::LBrace, TokenKind::RBrace),
            TokenKind::LParen => (TokenKind::LParen, TokenKind::RParen),
            TokenKind::LBracket => (TokenKind::LBracket, TokenKind::RBracket),
            _ => return None,
        };
        let mut depth = 0usize;
        for j in open..self.tokens.len() {
            let kind = self.tokens[j].kind;
            if kind == opening {
                depth += 1;
            } else if kind == closing {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
        }
        None
    }

    /// Deletes tokens `start..end` as a statement.
    fn delete_tokens(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let lo = self.tokens[start].span.lo();
        let hi = self.tokens[end - 1].span.hi();
        self.edits.delete_lines(Span::from_usize(lo, hi));
    }

    fn kind(&self, i: usize) -> Option<TokenKind> {
        self.tokens.get(i).map(|token| token.kind)
    }

    fn is_word_at(&self, i: usize) -> bool {
        self.kind(i).is_some_and(TokenKind::is_word)
    }

    fn text(&self, i: usize) -> &'a str {
        let source = self.source;
        self.tokens
            .get(i)
            .and_then(|token| token.span.slice(source))
            .unwrap_or_default()
    }
}

/// `type A` or `type A as B`, but not a binding that is itself named `type`.
fn is_type_specifier(item: &str) -> bool {
    let mut words = item.split_whitespace();
    words.next() == Some("type") && !matches!(words.next(), None | Some("as"))
}

/// True if a line ending in `last` cannot end a statement.
fn continues_after(last: TokenKind) -> bool {
    matches!(
        last,
        TokenKind::Comma
            | TokenKind::LBrace
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::Eq
            | TokenKind::Arrow
            | TokenKind::Pipe
            | TokenKind::Amp
            | TokenKind::Colon
            | TokenKind::LAngle
            | TokenKind::Question
            | TokenKind::Dot
            | TokenKind::Operator
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(source: &str) -> String {
        strip_lexically(source, &ExtensionMap::default())
            .apply(source)
            .code
    }

    #[test]
    fn test_removes_interface_with_nested_braces() {
        let source = "interface Props {\n  style: { color: string };\n}\nconst a = {};\n";
        assert_eq!(strip(source), "const a = {};\n");
    }

    #[test]
    fn test_removes_multiline_type_alias() {
        let source = "type Mode =\n  | 'light'\n  | 'dark';\nlet mode = 'light';\n";
        assert_eq!(strip(source), "let mode = 'light';\n");
    }

    #[test]
    fn test_removes_generic_alias_without_semicolon() {
        let source = "export type Pair<T> = [T, T]\nexport const x = 1\n";
        assert_eq!(strip(source), "export const x = 1\n");
    }

    #[test]
    fn test_nested_generic_alias() {
        let source = "type Table = Map<string, Array<Set<number>>>\nrun()\n";
        assert_eq!(strip(source), "run()\n");
    }

    #[test]
    fn test_type_only_import_and_export() {
        let source =
            "import type { A } from './a';\nexport type { B } from './b';\nimport c from 'c';\n";
        assert_eq!(strip(source), "import c from 'c';\n");
    }

    #[test]
    fn test_import_of_default_named_type() {
        let source = "import type from './type.ts';\n";
        assert_eq!(strip(source), "import type from './type.js';\n");
    }

    #[test]
    fn test_splits_mixed_import() {
        let source = "import { type A, b } from './mod.ts';\n";
        assert_eq!(strip(source), "import { b } from './mod.js';\n");
    }

    #[test]
    fn test_default_import_keeps_binding() {
        let source = "import React, { type FC } from 'react';\n";
        assert_eq!(strip(source), "import React from 'react';\n");
    }

    #[test]
    fn test_ambient_declarations() {
        let source = "declare module 'x' {\n  export const y: number;\n}\ndeclare const z: string;\nrun();\n";
        assert_eq!(strip(source), "run();\n");
    }

    #[test]
    fn test_keywords_inside_strings_and_comments() {
        let source = "const s = 'interface A {}';\n// type B = 1;\nconst t = `type ${x} = 1`;\n";
        assert_eq!(strip(source), source);
    }

    #[test]
    fn test_braces_inside_regex_and_template() {
        let source = "const re = /[{]/;\ninterface A {\n  b: `}`;\n}\nconst c = `${'}'}`;\n";
        assert_eq!(strip(source), "const re = /[{]/;\nconst c = `${'}'}`;\n");
    }

    #[test]
    fn test_object_keys_named_like_keywords() {
        let source = "const o = { type: 'a', interface: 1 };\nconfig.type = 'b';\n";
        assert_eq!(strip(source), source);
    }

    #[test]
    fn test_rewrites_dynamic_and_require_specifiers() {
        let source = "const a = import('./a.ts');\nconst b = require(\"../b.tsx\");\n";
        assert_eq!(
            strip(source),
            "const a = import('./a.js');\nconst b = require(\"../b.jsx\");\n"
        );
    }

    #[test]
    fn test_type_specifier_detection() {
        assert!(is_type_specifier("type A"));
        assert!(is_type_specifier("type A as B"));
        assert!(!is_type_specifier("type"));
        assert!(!is_type_specifier("type as t"));
        assert!(!is_type_specifier("A"));
    }
}
