//! Ordered text edits applied in a single pass.

use crate::Span;

/// One change to the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The span of original text being replaced.
    pub span: Span,
    /// Replacement text; empty for deletions.
    pub replacement: String,
    /// Widen the deletion to its whole line when nothing else shares that line.
    pub whole_line: bool,
}

impl Edit {
    /// A plain deletion.
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
            whole_line: false,
        }
    }

    /// A statement-level deletion that also consumes surrounding indentation
    /// and the trailing line break.
    pub fn delete_lines(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
            whole_line: true,
        }
    }

    /// Replaces a span with new text.
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            whole_line: false,
        }
    }
}

/// The output of [`EditSet::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    /// The edited text.
    pub code: String,
    /// Output offsets where an entire line was removed.
    pub seams: Vec<usize>,
    /// Output offsets where a statement-level deletion was applied, whether
    /// or not its line went with it.
    pub statement_gaps: Vec<usize>,
}

/// A collection of edits against one source text.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

#[derive(Debug)]
struct Resolved {
    start: usize,
    end: usize,
    replacement: String,
    line_removed: bool,
    statement: bool,
}

impl Resolved {
    fn is_insertion(&self) -> bool {
        self.start == self.end && !self.replacement.is_empty()
    }
}

impl EditSet {
    /// Creates an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded edits.
    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if no edits were recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Records an edit.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Records a deletion.
    pub fn delete(&mut self, span: Span) {
        self.push(Edit::delete(span));
    }

    /// Records a statement deletion.
    pub fn delete_lines(&mut self, span: Span) {
        self.push(Edit::delete_lines(span));
    }

    /// Records a replacement.
    pub fn replace(&mut self, span: Span, replacement: impl Into<String>) {
        self.push(Edit::replace(span, replacement));
    }

    /// Applies all edits to `source`.
    ///
    /// Edits that fall outside the text or split a character are ignored.
    /// A deletion swallows anything it overlaps; a replacement that overlaps an
    /// earlier edit is dropped. Zero-width insertions go before any edit that
    /// starts at the same offset.
    pub fn apply(&self, source: &str) -> Applied {
        let mut resolved: Vec<Resolved> = self
            .edits
            .iter()
            .filter(|edit| {
                let (lo, hi) = (edit.span.lo(), edit.span.hi());
                lo <= hi
                    && hi <= source.len()
                    && source.is_char_boundary(lo)
                    && source.is_char_boundary(hi)
            })
            .map(|edit| resolve(source, edit))
            .collect();

        resolved.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.is_insertion().cmp(&a.is_insertion()))
                .then(b.end.cmp(&a.end))
        });

        let mut merged: Vec<Resolved> = Vec::with_capacity(resolved.len());
        for edit in resolved {
            match merged.last_mut() {
                Some(prev) if edit.start < prev.end => {
                    if !edit.replacement.is_empty() {
                        continue;
                    }
                    if edit.end > prev.end {
                        prev.end = edit.end;
                        prev.line_removed = edit.line_removed;
                    }
                    prev.statement |= edit.statement;
                    prev.replacement.clear();
                }
                _ => merged.push(edit),
            }
        }

        let mut out = String::with_capacity(source.len());
        let mut seams = Vec::new();
        let mut statement_gaps = Vec::new();
        let mut last = 0;
        for edit in merged {
            out.push_str(&source[last..edit.start]);
            if edit.line_removed {
                seams.push(out.len());
            }
            if edit.statement {
                statement_gaps.push(out.len());
            }
            out.push_str(&edit.replacement);
            last = edit.end;
        }
        out.push_str(&source[last..]);

        Applied {
            code: out,
            seams,
            statement_gaps,
        }
    }
}

fn resolve(source: &str, edit: &Edit) -> Resolved {
    let (lo, hi) = (edit.span.lo(), edit.span.hi());
    if !edit.whole_line {
        return Resolved {
            start: lo,
            end: hi,
            replacement: edit.replacement.clone(),
            line_removed: false,
            statement: false,
        };
    }

    let bytes = source.as_bytes();
    let mut line_start = lo;
    while line_start > 0 && matches!(bytes[line_start - 1], b' ' | b'\t') {
        line_start -= 1;
    }
    let at_line_start = line_start == 0 || bytes[line_start - 1] == b'\n';

    let mut end = hi;
    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    let line_break = if end >= bytes.len() {
        Some(end)
    } else if bytes[end] == b'\n' {
        Some(end + 1)
    } else if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
        Some(end + 2)
    } else {
        None
    };

    match (at_line_start, line_break) {
        (true, Some(after)) => Resolved {
            start: line_start,
            end: after,
            replacement: String::new(),
            line_removed: true,
            statement: true,
        },
        // Code before it on the same line: keep the line, drop the blanks
        // that would otherwise trail it.
        (false, Some(_)) => Resolved {
            start: line_start,
            end,
            replacement: String::new(),
            line_removed: false,
            statement: true,
        },
        // Other code follows on the same line: keep indentation, eat the gap.
        _ => Resolved {
            start: lo,
            end,
            replacement: String::new(),
            line_removed: false,
            statement: true,
        },
    }
}
