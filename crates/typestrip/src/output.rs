//! Output formatting.

use crate::cli::OutputFormat;
use crate::orchestrator::{FileReport, Outcome, RunSummary, Timings};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;
use typestrip_transformer::Diagnostic;

/// A file record in JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFile {
    pub source: String,
    pub destination: String,
    /// `converted`, `unchanged`, `dry-run` or `failed`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    pub source_deleted: bool,
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub diagnostics: Vec<FormattedDiagnostic>,
}

/// A transformer diagnostic in JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    pub kind: &'static str,
    pub message: String,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
}

/// Aggregate counts in JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSummary {
    pub converted: usize,
    pub unchanged: usize,
    pub would_convert: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedTimings {
    scan_ms: f64,
    convert_ms: f64,
    total_ms: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument {
    files: Vec<FormattedFile>,
    root_errors: Vec<String>,
    summary: FormattedSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    timings: Option<FormattedTimings>,
}

/// Text destined for stdout and stderr.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr: String,
}

/// Formats run results for output.
pub struct Formatter {
    format: OutputFormat,
    workspace: Utf8PathBuf,
}

impl Formatter {
    /// Creates a new formatter. Paths are shown relative to `workspace`.
    pub fn new(format: OutputFormat, workspace: impl Into<Utf8PathBuf>) -> Self {
        Self {
            format,
            workspace: workspace.into(),
        }
    }

    /// Prints a run summary.
    pub fn emit(&self, summary: &RunSummary, timings: bool) {
        let rendered = self.render(summary, timings);
        print!("{}", rendered.stdout);
        eprint!("{}", rendered.stderr);
    }

    /// Renders a run summary without printing it.
    pub fn render(&self, summary: &RunSummary, timings: bool) -> Rendered {
        match self.format {
            OutputFormat::Human => self.format_human(summary, timings),
            OutputFormat::Json => Rendered {
                stdout: self.format_json(summary, timings),
                stderr: String::new(),
            },
        }
    }

    /// Formats diagnostics as `Warning:` lines.
    pub fn format_warnings(&self, source: &Utf8Path, diagnostics: &[Diagnostic]) -> String {
        let path = self.relative(source);
        let mut output = String::new();
        for diag in diagnostics {
            let note = if diag.kind.is_error() {
                " (converted with the lexical fallback)"
            } else {
                ""
            };
            let _ = writeln!(
                output,
                "Warning: {}:{}:{}: {}{}",
                path, diag.line, diag.column, diag.message, note
            );
        }
        output
    }

    fn relative<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        path.strip_prefix(&self.workspace).unwrap_or(path)
    }

    /// Formats as human-readable output.
    fn format_human(&self, summary: &RunSummary, timings: bool) -> Rendered {
        let mut rendered = Rendered::default();

        for error in &summary.root_errors {
            let _ = writeln!(rendered.stderr, "Error: {}", error);
        }

        for report in &summary.reports {
            let source = self.relative(&report.source);
            let destination = self.relative(&report.destination);
            rendered
                .stderr
                .push_str(&self.format_warnings(&report.source, &report.diagnostics));

            match &report.outcome {
                Outcome::Written { source_deleted, .. } => {
                    let _ = writeln!(
                        rendered.stdout,
                        "Converted: {} -> {}{}",
                        source,
                        destination,
                        removed_suffix(*source_deleted)
                    );
                }
                Outcome::Unchanged { source_deleted } => {
                    let _ = writeln!(
                        rendered.stdout,
                        "Unchanged: {} -> {}{}",
                        source,
                        destination,
                        removed_suffix(*source_deleted)
                    );
                }
                Outcome::DryRun => {
                    let _ = writeln!(
                        rendered.stdout,
                        "Would convert: {} -> {}",
                        source, destination
                    );
                }
                Outcome::Failed(error) => {
                    let _ = writeln!(rendered.stderr, "Error: {}: {}", source, error);
                }
            }
        }

        let _ = writeln!(rendered.stdout, "{}", summary_line(summary));

        if timings {
            rendered
                .stderr
                .push_str(&format_timings(&summary.timings, summary.reports.len()));
        }

        rendered
    }

    /// Formats as one JSON document.
    fn format_json(&self, summary: &RunSummary, timings: bool) -> String {
        let document = JsonDocument {
            files: summary
                .reports
                .iter()
                .map(|report| self.format_file(report))
                .collect(),
            root_errors: summary.root_errors.iter().map(|e| e.to_string()).collect(),
            summary: FormattedSummary {
                converted: summary.converted(),
                unchanged: summary.unchanged(),
                would_convert: summary.would_convert(),
                failed: summary.failed(),
            },
            timings: timings.then(|| FormattedTimings {
                scan_ms: duration_ms(summary.timings.scan),
                convert_ms: duration_ms(summary.timings.convert),
                total_ms: duration_ms(summary.timings.total),
            }),
        };
        let mut json = serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string());
        json.push('\n');
        json
    }

    fn format_file(&self, report: &FileReport) -> FormattedFile {
        let (status, bytes, source_deleted) = match &report.outcome {
            Outcome::Written {
                bytes,
                source_deleted,
            } => ("converted", Some(*bytes), *source_deleted),
            Outcome::Unchanged { source_deleted } => ("unchanged", None, *source_deleted),
            Outcome::DryRun => ("dry-run", None, false),
            Outcome::Failed(_) => ("failed", None, false),
        };
        let error = match &report.outcome {
            Outcome::Failed(error) => Some(error.to_string()),
            _ => None,
        };

        FormattedFile {
            source: self.relative(&report.source).to_string(),
            destination: self.relative(&report.destination).to_string(),
            status,
            bytes,
            source_deleted,
            used_fallback: report.used_fallback,
            error,
            diagnostics: report
                .diagnostics
                .iter()
                .map(|diag| FormattedDiagnostic {
                    kind: diag.kind.as_str(),
                    message: diag.message.clone(),
                    line: diag.line,
                    column: diag.column,
                })
                .collect(),
        }
    }
}

/// Formats the summary line.
pub fn summary_line(summary: &RunSummary) -> String {
    let (verb, count) = if summary.would_convert() > 0 {
        ("would convert", summary.would_convert())
    } else {
        ("converted", summary.converted())
    };
    let file_word = if count == 1 { "file" } else { "files" };
    format!(
        "typestrip {} {} {}, {} unchanged, {} failed",
        verb,
        count,
        file_word,
        summary.unchanged(),
        summary.failed()
    )
}

fn format_timings(timings: &Timings, file_count: usize) -> String {
    format!(
        "=== typestrip timings ===\nfile scan: {:?} ({} files)\nconvert: {:?}\ntotal: {:?}\n",
        timings.scan, file_count, timings.convert, timings.total
    )
}

fn removed_suffix(source_deleted: bool) -> &'static str {
    if source_deleted {
        " (original removed)"
    } else {
        ""
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
