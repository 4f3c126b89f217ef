//! Problems found while stripping a file.

use source_edit::{LineIndex, Span};
use std::fmt;

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The parser could not build a tree; the lexical fallback was used.
    ParseError,
    /// The parser recovered from an error and the tree may be incomplete.
    RecoveredParseError,
    /// A non-ambient `enum`, which has runtime semantics and is kept as-is.
    Enum,
    /// An instantiated `namespace`, which has runtime semantics and is kept as-is.
    Namespace,
    /// `import x = require(...)`, which is not valid JavaScript.
    ImportEquals,
    /// `export = x`, which is not valid JavaScript.
    ExportAssignment,
}

impl DiagnosticKind {
    /// Returns true if the output may be incomplete or invalid.
    pub fn is_error(self) -> bool {
        matches!(self, Self::ParseError)
    }

    /// Short stable name, used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse-error",
            Self::RecoveredParseError => "recovered-parse-error",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::ImportEquals => "import-equals",
            Self::ExportAssignment => "export-assignment",
        }
    }
}

/// A diagnostic with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in characters.
    pub column: u32,
}

impl Diagnostic {
    pub(crate) fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        span: Span,
        index: &LineIndex<'_>,
    ) -> Self {
        let (line, column) = index
            .line_col(span.start)
            .map(|lc| lc.one_based())
            .unwrap_or((1, 1));
        Self {
            kind,
            message: message.into(),
            span,
            line,
            column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}
