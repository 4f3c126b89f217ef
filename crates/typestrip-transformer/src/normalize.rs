//! Cleanup of the text around removed statements.

use source_edit::{Applied, EditSet, Span};

/// Tidies edited output: collapses blank lines at seams and keeps statements
/// on either side of a removal from running together.
pub(crate) fn tidy(applied: &Applied) -> String {
    let code = applied.code.as_str();
    let mut edits = EditSet::new();
    collapse_seams(code, &applied.seams, &mut edits);
    separate_statements(code, &applied.statement_gaps, &mut edits);
    if edits.is_empty() {
        return applied.code.clone();
    }
    edits.apply(code).code
}

/// Converts CRLF line endings to LF.
pub(crate) fn to_lf(code: &str) -> String {
    code.replace("\r\n", "\n")
}

/// Collapses the blank lines around each seam.
///
/// A run of blank lines touching a seam shrinks to one line, or disappears
/// when it reaches the start or end of the file. Blank lines away from seams
/// are never touched.
fn collapse_seams(code: &str, seams: &[usize], edits: &mut EditSet) {
    for &seam in seams {
        let Some((run_start, run_end, lines)) = blank_run(code, seam) else {
            continue;
        };
        if lines == 0 {
            continue;
        }
        if run_start == 0 || run_end == code.len() {
            edits.delete(Span::from_usize(run_start, run_end));
        } else if lines > 1 {
            let keep = line_end(code, run_start);
            edits.delete(Span::from_usize(keep, run_end));
        }
    }
}

/// Inserts a `;` where removing a statement let the next line continue the
/// previous one, as in `a` followed by `(b)()`.
fn separate_statements(code: &str, gaps: &[usize], edits: &mut EditSet) {
    let mut last = None;
    for &gap in gaps {
        if gap > code.len() || !code.is_char_boundary(gap) {
            continue;
        }
        let before = code[..gap].trim_end();
        if before.is_empty() || before.ends_with([';', '{']) {
            continue;
        }
        let next = skip_trivia(code, gap);
        let continues = matches!(
            code.as_bytes().get(next),
            Some(b'(' | b'[' | b'`' | b'+' | b'-' | b'/')
        );
        if continues && last != Some(next) {
            edits.replace(Span::from_usize(next, next), ";");
            last = Some(next);
        }
    }
}

/// Offset of the first character at or after `pos` that is neither
/// whitespace nor inside a comment.
fn skip_trivia(code: &str, mut pos: usize) -> usize {
    let bytes = code.as_bytes();
    while pos < bytes.len() {
        match (bytes[pos], bytes.get(pos + 1)) {
            (b'/', Some(b'/')) => {
                pos = code[pos..].find('\n').map_or(bytes.len(), |nl| pos + nl);
            }
            (b'/', Some(b'*')) => {
                pos = code[pos + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |end| pos + 2 + end + 2);
            }
            (b, _) if b.is_ascii_whitespace() => pos += 1,
            _ => break,
        }
    }
    pos
}

/// The maximal run of blank lines around `seam`, as `(start, end, count)`.
/// `seam` must sit at a line start.
fn blank_run(code: &str, seam: usize) -> Option<(usize, usize, usize)> {
    if seam > code.len() || (seam > 0 && code.as_bytes()[seam - 1] != b'\n') {
        return None;
    }

    let mut lines = 0;
    let mut start = seam;
    while start > 0 {
        let prev_start = code[..start - 1].rfind('\n').map_or(0, |nl| nl + 1);
        if !is_blank(&code[prev_start..start]) {
            break;
        }
        start = prev_start;
        lines += 1;
    }

    let mut end = seam;
    while end < code.len() {
        let next_end = line_end(code, end);
        if !is_blank(&code[end..next_end]) {
            break;
        }
        end = next_end;
        lines += 1;
    }

    Some((start, end, lines))
}

/// Offset just past the line break of the line starting at `start`.
fn line_end(code: &str, start: usize) -> usize {
    code[start..].find('\n').map_or(code.len(), |nl| start + nl + 1)
}

fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}
