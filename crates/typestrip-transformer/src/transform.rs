//! Main transformation entry point.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::fallback::strip_lexically;
use crate::normalize::{tidy, to_lf};
use crate::strip::TypeStripper;
use crate::TransformOptions;
use source_edit::{LineIndex, Span};
use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_parser::{Parser, StringInput};
use swc_ecma_visit::VisitWith;

/// Result of stripping one file.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The untyped output.
    pub code: String,
    /// Constructs that were left in place, and recovered parse errors.
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the parser rejected the input.
    pub parse_error: Option<Diagnostic>,
    /// True when the lexical fallback produced `code`.
    pub used_fallback: bool,
    /// True when `code` differs from the input.
    pub changed: bool,
}

/// Removes type-level syntax from `source`.
///
/// Never fails: input the parser rejects goes through a lexical pass that
/// handles statement-level constructs only, and the result says so.
pub fn transform(source: &str, options: &TransformOptions) -> TransformResult {
    let (bom, body) = match source.strip_prefix('\u{feff}') {
        Some(body) => ("\u{feff}", body),
        None => ("", source),
    };
    let index = LineIndex::new(body);

    let cm: Lrc<SourceMap> = Default::default();
    let name = options
        .filename
        .clone()
        .unwrap_or_else(|| "input.tsx".to_string());
    let fm = cm.new_source_file(FileName::Custom(name).into(), body.to_string());
    let comments = SingleThreadedComments::default();

    let mut parser = Parser::new(
        options.kind.syntax(),
        StringInput::from(&*fm),
        Some(&comments as &dyn Comments),
    );
    let parsed = parser.parse_module();
    let recovered = parser.take_errors();

    let to_span = |span: swc_common::Span| {
        let lo = span.lo.0.saturating_sub(fm.start_pos.0) as usize;
        let hi = span.hi.0.saturating_sub(fm.start_pos.0) as usize;
        Span::from_usize(lo.min(body.len()), hi.min(body.len()))
    };

    let (edits, mut diagnostics, parse_error) = match parsed {
        Ok(module) => {
            let mut stripper = TypeStripper::new(body, fm.start_pos, &comments, options);
            module.visit_with(&mut stripper);
            let stripped = stripper.finish();

            let mut diagnostics: Vec<Diagnostic> = recovered
                .iter()
                .map(|err| {
                    Diagnostic::new(
                        DiagnosticKind::RecoveredParseError,
                        err.kind().msg().to_string(),
                        to_span(err.span()),
                        &index,
                    )
                })
                .collect();
            diagnostics.extend(
                stripped
                    .findings
                    .into_iter()
                    .map(|(kind, message, span)| Diagnostic::new(kind, message, span, &index)),
            );
            (stripped.edits, diagnostics, None)
        }
        Err(err) => {
            let error = Diagnostic::new(
                DiagnosticKind::ParseError,
                err.kind().msg().to_string(),
                to_span(err.span()),
                &index,
            );
            tracing::debug!(
                file = options.filename.as_deref().unwrap_or("<input>"),
                error = %error,
                "parse failed, using lexical fallback"
            );
            let edits = strip_lexically(body, &options.extension_map);
            (edits, Vec::new(), Some(error))
        }
    };

    let applied = edits.apply(body);
    let mut code = tidy(&applied);
    if options.normalize_line_endings {
        code = to_lf(&code);
    }
    code.insert_str(0, bom);

    diagnostics.sort_by_key(|d| d.span.start);
    let changed = code != source;
    TransformResult {
        code,
        diagnostics,
        used_fallback: parse_error.is_some(),
        parse_error,
        changed,
    }
}
