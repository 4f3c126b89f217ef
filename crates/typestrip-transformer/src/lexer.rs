//! TypeScript token stream using logos.
//!
//! The token set is just rich enough for statement-level stripping:
//! keywords that start type-only statements, brackets, and the operators
//! that decide whether a line break ends a statement. Comments and line
//! breaks never reach the caller; a token instead records whether a line
//! break came before it.
//!
//! Template literals, block comments and regular expressions cannot be
//! described by a single pattern, so logos only matches their opening
//! characters and [`Lexer`] consumes the rest.

use logos::Logos;
use source_edit::Span;

/// A significant token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
    /// True if a line break, possibly inside a comment, separates this
    /// token from the previous one.
    pub line_break_before: bool,
}

/// Token kinds for TypeScript and JSX source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\f\x{A0}\x{FEFF}]+")]
pub(crate) enum TokenKind {
    // === Keywords ===
    /// `import`
    #[token("import", priority = 5)]
    Import,

    /// `export`
    #[token("export", priority = 5)]
    Export,

    /// `type`
    #[token("type", priority = 5)]
    Type,

    /// `interface`
    #[token("interface", priority = 5)]
    Interface,

    /// `declare`
    #[token("declare", priority = 5)]
    Declare,

    /// `default`
    #[token("default", priority = 5)]
    Default,

    /// `from`
    #[token("from", priority = 5)]
    From,

    // === Brackets ===
    /// `{`
    #[token("{", priority = 10)]
    LBrace,

    /// `}`
    #[token("}", priority = 10)]
    RBrace,

    /// `(`
    #[token("(", priority = 10)]
    LParen,

    /// `)`
    #[token(")", priority = 10)]
    RParen,

    /// `[`
    #[token("[", priority = 10)]
    LBracket,

    /// `]`
    #[token("]", priority = 10)]
    RBracket,

    /// `<`, never merged with a following `<` or `=`.
    #[token("<", priority = 10)]
    LAngle,

    /// `>`, never merged so nested generics close one at a time.
    #[token(">", priority = 10)]
    RAngle,

    // === Punctuation ===
    /// `;`
    #[token(";", priority = 10)]
    Semi,

    /// `,`
    #[token(",", priority = 10)]
    Comma,

    /// `.` or `?.`
    #[token(".", priority = 10)]
    #[token("?.", priority = 10)]
    Dot,

    /// `...`
    #[token("...", priority = 10)]
    Ellipsis,

    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `=>`
    #[token("=>", priority = 10)]
    Arrow,

    /// `?`
    #[token("?", priority = 10)]
    Question,

    /// `:`
    #[token(":", priority = 10)]
    Colon,

    /// `|`
    #[token("|", priority = 10)]
    Pipe,

    /// `&`
    #[token("&", priority = 10)]
    Amp,

    /// `*`
    #[token("*", priority = 10)]
    Star,

    /// `+`
    #[token("+", priority = 10)]
    Plus,

    /// `-`
    #[token("-", priority = 10)]
    Minus,

    /// `++` or `--`
    #[token("++", priority = 10)]
    #[token("--", priority = 10)]
    Update,

    /// `/` or `/=`. Becomes [`TokenKind::Regex`] where an operand is expected.
    #[token("/", priority = 10)]
    #[token("/=", priority = 10)]
    Slash,

    /// Comparison, logical and compound assignment operators.
    #[token("==", priority = 10)]
    #[token("===", priority = 10)]
    #[token("!=", priority = 10)]
    #[token("!==", priority = 10)]
    #[token("&&", priority = 10)]
    #[token("||", priority = 10)]
    #[token("??", priority = 10)]
    #[token("**", priority = 10)]
    #[token("+=", priority = 10)]
    #[token("-=", priority = 10)]
    #[token("*=", priority = 10)]
    #[token("%=", priority = 10)]
    #[token("&=", priority = 10)]
    #[token("|=", priority = 10)]
    #[token("^=", priority = 10)]
    #[token("**=", priority = 10)]
    #[token("&&=", priority = 10)]
    #[token("||=", priority = 10)]
    #[token("??=", priority = 10)]
    Operator,

    /// Any other single punctuation character.
    #[regex(r"[!%^~@#\\]", priority = 1)]
    Punct,

    // === Literals ===
    /// A quoted string. Unterminated strings stop at the line break.
    #[regex(r#""([^"\\\n]|\\(.|\n))*"?"#)]
    #[regex(r"'([^'\\\n]|\\(.|\n))*'?")]
    Str,

    /// A template literal, substitutions included.
    #[token("`", priority = 10)]
    Template,

    /// A regular expression literal.
    Regex,

    /// A number
    #[regex(r"[0-9][0-9a-zA-Z_.]*", priority = 4)]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*", priority = 4)]
    Number,

    /// An identifier or a keyword without a kind of its own.
    #[regex(r"[a-zA-Z_$\p{XID_Start}][a-zA-Z0-9_$\p{XID_Continue}]*", priority = 4)]
    Ident,

    // === Trivia ===
    /// Newline
    #[token("\n", priority = 10)]
    Newline,

    /// `// ...`
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    /// `/* ... */`
    #[token("/*", priority = 10)]
    BlockComment,

    /// Invalid/unknown token
    #[default]
    Error,
}

/// Words after which a `/` starts a regular expression rather than a
/// division.
const KEYWORDS_BEFORE_EXPRESSION: &[&str] = &[
    "return",
    "typeof",
    "case",
    "do",
    "else",
    "in",
    "instanceof",
    "new",
    "void",
    "delete",
    "throw",
    "yield",
    "await",
    "of",
];

impl TokenKind {
    /// Returns true for identifiers and keywords.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::Type
                | TokenKind::Interface
                | TokenKind::Declare
                | TokenKind::Default
                | TokenKind::From
        )
    }

    /// Returns true if a `/` right after this token cannot start a regular
    /// expression: after an operand, or after the `<` of a JSX closing tag.
    fn precedes_division(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Type
                | TokenKind::From
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::Template
                | TokenKind::Regex
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Update
                | TokenKind::LAngle
        )
    }
}

/// A lexer for TypeScript source code.
pub(crate) struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    regex_allowed: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            regex_allowed: true,
        }
    }

    /// Extends the current token by `len` bytes, clamped to the input.
    fn bump(&mut self, len: usize) {
        let len = len.min(self.inner.remainder().len());
        self.inner.bump(len);
    }

    /// Length of the regular expression whose body starts right after the
    /// current `/`, counted past the end of the current token.
    fn regex_tail(&self) -> Option<usize> {
        let span = self.inner.span();
        let body = &self.source[span.start + 1..];
        let len = regex_len(body)?;
        Some((span.start + 1 + len).saturating_sub(span.end))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line_break_before = false;
        loop {
            let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
            let kind = match kind {
                TokenKind::Newline => {
                    line_break_before = true;
                    continue;
                }
                TokenKind::LineComment => continue,
                TokenKind::BlockComment => {
                    let rest = self.inner.remainder();
                    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
                    line_break_before |= rest[..len].contains('\n');
                    self.bump(len);
                    continue;
                }
                TokenKind::Template => {
                    self.bump(template_len(self.inner.remainder()));
                    TokenKind::Template
                }
                TokenKind::Slash if self.regex_allowed => match self.regex_tail() {
                    Some(tail) => {
                        self.bump(tail);
                        TokenKind::Regex
                    }
                    None => TokenKind::Slash,
                },
                other => other,
            };

            self.regex_allowed = if kind == TokenKind::Ident {
                KEYWORDS_BEFORE_EXPRESSION.contains(&self.inner.slice())
            } else {
                !kind.precedes_division()
            };

            let span = self.inner.span();
            return Some(Token {
                kind,
                span: Span::from_usize(span.start, span.end),
                line_break_before,
            });
        }
    }
}

/// Length of a template literal body plus its closing backtick. `rest`
/// starts just after the opening backtick.
fn template_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i += 2;
                i += substitution_len(&rest[i.min(rest.len())..]);
            }
            _ => i += 1,
        }
    }
    rest.len()
}

/// Length of a `${ ... }` substitution body plus its closing brace.
fn substitution_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return i + 1,
            b'}' => depth -= 1,
            b'`' => {
                i += 1 + template_len(&rest[i + 1..]);
                continue;
            }
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = rest[i + 2..].find("*/").map_or(bytes.len(), |end| i + 2 + end + 2);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = rest[i..].find('\n').map_or(bytes.len(), |nl| i + nl);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    rest.len()
}

/// Length of a regular expression body, closing slash and flags. `body`
/// starts just after the opening slash. Returns `None` if the line ends
/// first.
fn regex_len(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut in_class = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => return None,
            b'\\' => {
                if matches!(bytes.get(i + 1), None | Some(b'\n' | b'\r')) {
                    return None;
                }
                i += 2;
                continue;
            }
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                let flags = body[i + 1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric())
                    .count();
                return Some(i + 1 + flags);
            }
            _ => {}
        }
        i += 1;
    }
    None
}
