//! Main orchestration logic.
//!
//! A run walks every source root once, maps each eligible file to its
//! destination, then converts the files in parallel. Each file moves through
//! `Discovered -> Read -> Converted -> Written -> (Deleted | Kept)`; any I/O
//! failure stops that file only.

use crate::config::{normalize, ConvertConfig, WriteMode};
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use thiserror::Error;
use typestrip_transformer::{transform, Diagnostic, ExtensionMap, TransformResult};
use walkdir::{DirEntry, WalkDir};

/// A source root that could not be walked.
#[derive(Debug, Error)]
pub enum RootError {
    /// The root does not exist.
    #[error("source root {0} does not exist")]
    Missing(Utf8PathBuf),

    /// The root exists but is a file.
    #[error("source root {0} is not a directory")]
    NotADirectory(Utf8PathBuf),

    /// The root or a directory below it could not be read.
    #[error("failed to read {path}: {message}")]
    Unreadable { path: Utf8PathBuf, message: String },
}

/// Why a single file failed.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source could not be read, or is not UTF-8.
    #[error("failed to read source: {0}")]
    Read(#[source] io::Error),

    /// The parser rejected the source in strict mode.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        line: u32,
        column: u32,
        message: String,
    },

    /// The destination directory could not be created.
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output could not be written. The source is untouched.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output was written but the original could not be removed.
    #[error("output written, but the original could not be removed: {0}")]
    Delete(#[source] io::Error),

    /// Another source maps to the same destination.
    #[error("destination {destination} is already produced from {other}")]
    Collision {
        destination: Utf8PathBuf,
        other: Utf8PathBuf,
    },
}

/// Errors in single-file mode.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The requested file does not exist.
    #[error("{0} does not exist")]
    NotFound(Utf8PathBuf),

    /// The file's extension is not in the extension map.
    #[error("{0} does not have a convertible extension")]
    NotEligible(Utf8PathBuf),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The conversion failed.
    #[error("{path}: {source}")]
    Convert {
        path: Utf8PathBuf,
        #[source]
        source: ConvertError,
    },
}

/// A typed source and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the source.
    pub path: Utf8PathBuf,
    /// The source root it was found under.
    pub root: Utf8PathBuf,
    /// Absolute path of the output.
    pub destination: Utf8PathBuf,
}

/// The snapshot of files a run works on.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    pub root_errors: Vec<RootError>,
}

/// What happened to one file.
#[derive(Debug)]
pub enum Outcome {
    /// The output was written.
    Written { bytes: usize, source_deleted: bool },
    /// The destination already had identical content. The source is still
    /// removed when originals are deleted.
    Unchanged { source_deleted: bool },
    /// Dry run; nothing was written.
    DryRun,
    /// The file failed; other files are unaffected.
    Failed(ConvertError),
}

/// Per-file result of a run.
#[derive(Debug)]
pub struct FileReport {
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub outcome: Outcome,
    /// Transformer diagnostics, including the parse error when the lexical
    /// fallback was used.
    pub diagnostics: Vec<Diagnostic>,
    pub used_fallback: bool,
}

impl FileReport {
    fn new(file: &SourceFile, outcome: Outcome) -> Self {
        Self {
            source: file.path.clone(),
            destination: file.destination.clone(),
            outcome,
            diagnostics: Vec::new(),
            used_fallback: false,
        }
    }
}

/// Phase timings of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timings {
    pub scan: Duration,
    pub convert: Duration,
    pub total: Duration,
}

/// Result of a run, with reports sorted by source path.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub root_errors: Vec<RootError>,
    pub timings: Timings,
}

impl RunSummary {
    /// Number of files written.
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Written { .. }))
    }

    /// Number of files whose destination was already up to date.
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged { .. }))
    }

    /// Number of files a dry run would have written.
    pub fn would_convert(&self) -> usize {
        self.count(|o| matches!(o, Outcome::DryRun))
    }

    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// True when no file failed and every root was readable.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.root_errors.is_empty()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Read,
    Converted,
    Written,
    Deleted,
    Kept,
}

fn trace_stage(file: &SourceFile, stage: Stage) {
    tracing::debug!(file = %file.path, ?stage, "file state");
}

/// Maps a source path to its output path.
///
/// The source root prefix is replaced by `destination_root` (or kept, for
/// in-place conversion) and the extension is swapped through `map`. Returns
/// `None` when the extension is not mapped or `source` is outside `root`.
pub fn destination_path(
    source: &Utf8Path,
    root: &Utf8Path,
    destination_root: Option<&Utf8Path>,
    map: &ExtensionMap,
) -> Option<Utf8PathBuf> {
    let file_name = source.file_name()?;
    let (offset, untyped) = map.match_suffix(file_name)?;
    let renamed = format!("{}{}", &file_name[..offset], untyped);

    let dir = source.parent()?;
    let dir = match destination_root {
        Some(destination_root) => destination_root.join(dir.strip_prefix(root).ok()?),
        None => dir.to_owned(),
    };
    Some(dir.join(renamed))
}

/// Walks every source root and collects the files to convert.
pub fn discover(config: &ConvertConfig) -> Discovery {
    let mut discovery = Discovery::default();
    let mut seen = HashSet::new();

    for root in &config.source_roots {
        match fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                discovery
                    .root_errors
                    .push(RootError::NotADirectory(root.clone()));
                continue;
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                discovery.root_errors.push(RootError::Missing(root.clone()));
                continue;
            }
            Err(err) => {
                discovery.root_errors.push(RootError::Unreadable {
                    path: root.clone(),
                    message: err.to_string(),
                });
                continue;
            }
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry, config));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .and_then(Utf8Path::from_path)
                        .map_or_else(|| root.clone(), Utf8Path::to_path_buf);
                    discovery.root_errors.push(RootError::Unreadable {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = match Utf8PathBuf::try_from(entry.into_path()) {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(path = %err.as_path().display(), "skipping non UTF-8 path");
                    continue;
                }
            };
            if let Some(file) = classify(path, root, config) {
                if seen.insert(file.path.clone()) {
                    discovery.files.push(file);
                }
            }
        }
    }

    discovery
}

fn is_pruned(entry: &DirEntry, config: &ConvertConfig) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let excluded = entry
        .file_name()
        .to_str()
        .is_some_and(|name| config.excluded_dirs.iter().any(|dir| dir == name));
    excluded
        || config
            .destination_root
            .as_deref()
            .is_some_and(|dest| entry.path() == dest.as_std_path())
}

fn classify(path: Utf8PathBuf, root: &Utf8Path, config: &ConvertConfig) -> Option<SourceFile> {
    let file_name = path.file_name()?;
    let (offset, _) = config.extension_map.match_suffix(file_name)?;
    if config.skip_declaration_files && file_name[..offset - 1].ends_with(".d") {
        tracing::debug!(file = %path, "skipping declaration file");
        return None;
    }

    let relative = path.strip_prefix(root).unwrap_or(&path);
    if config.ignore.is_match(relative.as_std_path()) {
        tracing::debug!(file = %path, "ignored");
        return None;
    }

    let destination = destination_path(
        &path,
        root,
        config.destination_root.as_deref(),
        &config.extension_map,
    )?;
    Some(SourceFile {
        path,
        root: root.to_owned(),
        destination,
    })
}

/// Converts every discovered file.
pub fn run(config: &ConvertConfig) -> RunSummary {
    let start = Instant::now();
    let Discovery { files, root_errors } = discover(config);
    let scan = start.elapsed();
    tracing::debug!(
        files = files.len(),
        roots = config.source_roots.len(),
        "discovered sources"
    );

    let convert_start = Instant::now();
    let collisions = find_collisions(&files);
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|file| match collisions.get(&file.path) {
            Some(other) => FileReport::new(
                file,
                Outcome::Failed(ConvertError::Collision {
                    destination: file.destination.clone(),
                    other: other.clone(),
                }),
            ),
            None => convert_file(file, config),
        })
        .collect();
    reports.sort_by(|a, b| a.source.cmp(&b.source));

    RunSummary {
        reports,
        root_errors,
        timings: Timings {
            scan,
            convert: convert_start.elapsed(),
            total: start.elapsed(),
        },
    }
}

/// Sources whose destination was already claimed by an earlier source.
fn find_collisions(files: &[SourceFile]) -> HashMap<Utf8PathBuf, Utf8PathBuf> {
    let mut owners: HashMap<&Utf8Path, &Utf8Path> = HashMap::new();
    let mut collisions = HashMap::new();
    for file in files {
        match owners.entry(file.destination.as_path()) {
            Entry::Occupied(owner) => {
                collisions.insert(file.path.clone(), owner.get().to_path_buf());
            }
            Entry::Vacant(slot) => {
                slot.insert(file.path.as_path());
            }
        }
    }
    collisions
}

/// Converts one file and writes its output.
///
/// Never panics and never returns early: every failure ends up in the
/// report's outcome.
pub fn convert_file(file: &SourceFile, config: &ConvertConfig) -> FileReport {
    tracing::debug!(
        file = %file.path,
        root = %file.root,
        destination = %file.destination,
        "converting"
    );
    let mut report = FileReport::new(file, Outcome::DryRun);
    let outcome = match try_convert(file, config, &mut report) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(file = %file.path, error = %err, "conversion failed");
            Outcome::Failed(err)
        }
    };
    report.outcome = outcome;
    report
}

fn try_convert(
    file: &SourceFile,
    config: &ConvertConfig,
    report: &mut FileReport,
) -> Result<Outcome, ConvertError> {
    let source = fs::read_to_string(&file.path).map_err(ConvertError::Read)?;
    trace_stage(file, Stage::Read);

    let result = strip_source(&source, &file.path, config)?;
    report.used_fallback = result.used_fallback;
    report.diagnostics = result
        .parse_error
        .into_iter()
        .chain(result.diagnostics)
        .collect();
    let code = result.code;
    trace_stage(file, Stage::Converted);

    if config.write_mode == WriteMode::SkipUnchanged
        && fs::read(&file.destination).is_ok_and(|existing| existing == code.as_bytes())
    {
        let source_deleted = if config.dry_run {
            trace_stage(file, Stage::Kept);
            false
        } else {
            delete_source(file, config)?
        };
        return Ok(Outcome::Unchanged { source_deleted });
    }
    if config.dry_run {
        return Ok(Outcome::DryRun);
    }

    write_output(&file.path, &file.destination, code.as_bytes())?;
    trace_stage(file, Stage::Written);
    let source_deleted = delete_source(file, config)?;

    Ok(Outcome::Written {
        bytes: code.len(),
        source_deleted,
    })
}

/// Removes the source once its output is in place, if originals are deleted
/// and the output did not replace the source itself.
fn delete_source(file: &SourceFile, config: &ConvertConfig) -> Result<bool, ConvertError> {
    if config.delete_original && file.path != file.destination {
        fs::remove_file(&file.path).map_err(ConvertError::Delete)?;
        trace_stage(file, Stage::Deleted);
        Ok(true)
    } else {
        trace_stage(file, Stage::Kept);
        Ok(false)
    }
}

fn strip_source(
    source: &str,
    path: &Utf8Path,
    config: &ConvertConfig,
) -> Result<TransformResult, ConvertError> {
    let mut result = transform(source, &config.transform_options(path));
    if config.strict {
        if let Some(error) = result.parse_error.take() {
            return Err(ConvertError::Parse {
                line: error.line,
                column: error.column,
                message: error.message,
            });
        }
    }
    Ok(result)
}

/// Writes `contents` to a temporary file beside `destination`, flushes it to
/// disk and renames it over the destination.
fn write_output(
    source: &Utf8Path,
    destination: &Utf8Path,
    contents: &[u8],
) -> Result<(), ConvertError> {
    let dir = destination.parent().unwrap_or(Utf8Path::new("."));
    fs::create_dir_all(dir).map_err(|source| ConvertError::CreateDir {
        path: dir.to_owned(),
        source,
    })?;

    let write_err = |source: io::Error| ConvertError::Write {
        path: destination.to_owned(),
        source,
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(contents).map_err(write_err)?;
    if let Ok(metadata) = fs::metadata(source) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_err)?;
    }
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(destination)
        .map_err(|err| write_err(err.error))?;
    Ok(())
}

/// Converts one file given on the command line.
///
/// A file under a source root is rebased like in a directory run; any other
/// file gets its output next to it.
pub fn convert_single(
    path: &Utf8Path,
    config: &ConvertConfig,
) -> Result<RunSummary, DriverError> {
    let start = Instant::now();
    let file = single_source(path, config)?;
    let report = convert_file(&file, config);
    let elapsed = start.elapsed();
    Ok(RunSummary {
        reports: vec![report],
        root_errors: Vec::new(),
        timings: Timings {
            scan: Duration::ZERO,
            convert: elapsed,
            total: elapsed,
        },
    })
}

/// Converts one file without writing anything.
pub fn strip_single(
    path: &Utf8Path,
    config: &ConvertConfig,
) -> Result<TransformResult, DriverError> {
    let file = single_source(path, config)?;
    let source = fs::read_to_string(&file.path).map_err(|source| DriverError::Read {
        path: file.path.clone(),
        source,
    })?;
    strip_source(&source, &file.path, config).map_err(|source| DriverError::Convert {
        path: file.path,
        source,
    })
}

fn single_source(path: &Utf8Path, config: &ConvertConfig) -> Result<SourceFile, DriverError> {
    let path = normalize(&config.workspace.join(path));
    if !path.is_file() {
        return Err(DriverError::NotFound(path));
    }

    let enclosing_root = config
        .source_roots
        .iter()
        .find(|root| path.starts_with(root));
    let (root, destination_root) = match enclosing_root {
        Some(root) => (root.clone(), config.destination_root.as_deref()),
        None => (path.parent().unwrap_or(&config.workspace).to_owned(), None),
    };

    match destination_path(&path, &root, destination_root, &config.extension_map) {
        Some(destination) => Ok(SourceFile {
            path,
            root,
            destination,
        }),
        None => Err(DriverError::NotEligible(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn workspace() -> (tempfile::TempDir, ConvertConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, ConvertConfig::defaults(root))
    }

    fn write(config: &ConvertConfig, relative: &str, contents: &str) {
        let path = config.workspace.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn read(config: &ConvertConfig, relative: &str) -> String {
        fs::read_to_string(config.workspace.join(relative)).unwrap()
    }

    fn relative_sources(config: &ConvertConfig, discovery: &Discovery) -> Vec<String> {
        discovery
            .files
            .iter()
            .map(|f| config.display_path(&f.path).to_string())
            .collect()
    }

    #[test]
    fn test_destination_path() {
        let map = ExtensionMap::default();
        let root = Utf8Path::new("/app/src");
        assert_eq!(
            destination_path(
                Utf8Path::new("/app/src/components/Button.tsx"),
                root,
                Some(Utf8Path::new("/app/src-js")),
                &map
            ),
            Some(Utf8PathBuf::from("/app/src-js/components/Button.jsx"))
        );
        assert_eq!(
            destination_path(Utf8Path::new("/app/src/lib/utils.ts"), root, None, &map),
            Some(Utf8PathBuf::from("/app/src/lib/utils.js"))
        );
        assert_eq!(
            destination_path(Utf8Path::new("/app/src/worker.mts"), root, None, &map),
            Some(Utf8PathBuf::from("/app/src/worker.mjs"))
        );
        assert_eq!(
            destination_path(Utf8Path::new("/app/src/styles.css"), root, None, &map),
            None
        );
        assert_eq!(
            destination_path(
                Utf8Path::new("/elsewhere/a.ts"),
                root,
                Some(Utf8Path::new("/app/src-js")),
                &map
            ),
            None
        );
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let (_dir, mut config) = workspace();
        write(&config, "src/b.ts", "");
        write(&config, "src/a/App.tsx", "");
        write(&config, "src/a/App.stories.tsx", "");
        write(&config, "src/types.d.ts", "");
        write(&config, "src/styles.css", "");
        write(&config, "src/node_modules/dep/index.ts", "");
        write(&config, "src/.git/hooks.ts", "");
        config.ignore = globset::GlobSetBuilder::new()
            .add(globset::Glob::new("**/*.stories.tsx").unwrap())
            .build()
            .unwrap();

        let discovery = discover(&config);
        assert!(discovery.root_errors.is_empty());
        assert_eq!(
            relative_sources(&config, &discovery),
            vec!["src/a/App.tsx", "src/b.ts"]
        );
        assert_eq!(
            config.display_path(&discovery.files[0].destination).as_str(),
            "src-js/a/App.jsx"
        );
    }

    #[test]
    fn test_declaration_files_can_be_included() {
        let (_dir, mut config) = workspace();
        write(&config, "src/types.d.ts", "declare const x: number;\n");
        config.skip_declaration_files = false;
        let discovery = discover(&config);
        assert_eq!(relative_sources(&config, &discovery), vec!["src/types.d.ts"]);
    }

    #[test]
    fn test_missing_root_does_not_stop_other_roots() {
        let (_dir, mut config) = workspace();
        write(&config, "lib/util.ts", "");
        config.source_roots = vec![config.workspace.join("missing"), config.workspace.join("lib")];
        config.destination_root = None;

        let discovery = discover(&config);
        assert_eq!(discovery.root_errors.len(), 1);
        assert!(matches!(discovery.root_errors[0], RootError::Missing(_)));
        assert_eq!(relative_sources(&config, &discovery), vec!["lib/util.ts"]);
    }

    #[test]
    fn test_destination_inside_root_is_not_walked() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "");
        write(&config, "src/out/a.ts", "");
        config.destination_root = Some(config.workspace.join("src/out"));
        let discovery = discover(&config);
        assert_eq!(relative_sources(&config, &discovery), vec!["src/a.ts"]);
    }

    #[test]
    fn test_run_writes_outputs() {
        let (_dir, config) = workspace();
        write(
            &config,
            "src/components/Card.tsx",
            "export const Card = (p: Props) => <div>{p.title}</div>;\n",
        );
        write(
            &config,
            "src/lib/math.ts",
            "export function add(a: number, b: number): number { return a + b; }\n",
        );

        let summary = run(&config);
        assert!(summary.is_success());
        assert_eq!(summary.converted(), 2);
        assert_eq!(
            read(&config, "src-js/components/Card.jsx"),
            "export const Card = (p) => <div>{p.title}</div>;\n"
        );
        assert_eq!(
            read(&config, "src-js/lib/math.js"),
            "export function add(a, b) { return a + b; }\n"
        );
        assert!(config.workspace.join("src/lib/math.ts").exists());
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "let x: number = 1;\n");
        assert_eq!(run(&config).converted(), 1);
        let first = read(&config, "src-js/a.js");

        let summary = run(&config);
        assert!(summary.is_success());
        assert_eq!(summary.converted(), 1);
        assert_eq!(read(&config, "src-js/a.js"), first);

        config.write_mode = WriteMode::SkipUnchanged;
        let summary = run(&config);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.converted(), 0);
    }

    #[test]
    fn test_delete_original_in_place() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "const a: string = 'a';\n");
        config.destination_root = None;
        config.delete_original = true;

        let summary = run(&config);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Written {
                source_deleted: true,
                ..
            }
        ));
        assert!(!config.workspace.join("src/a.ts").exists());
        assert_eq!(read(&config, "src/a.js"), "const a = 'a';\n");
    }

    #[test]
    fn test_unchanged_destination_still_deletes_source() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "let x: number = 1;\n");
        write(&config, "src-js/a.js", "let x = 1;\n");
        config.write_mode = WriteMode::SkipUnchanged;
        config.delete_original = true;

        config.dry_run = true;
        let summary = run(&config);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Unchanged {
                source_deleted: false
            }
        ));
        assert!(config.workspace.join("src/a.ts").exists());

        config.dry_run = false;
        let summary = run(&config);
        assert_eq!(summary.unchanged(), 1);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Unchanged {
                source_deleted: true
            }
        ));
        assert!(!config.workspace.join("src/a.ts").exists());
        assert_eq!(read(&config, "src-js/a.js"), "let x = 1;\n");
    }

    #[test]
    fn test_failed_write_keeps_source() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "const a: string = 'a';\n");
        fs::create_dir_all(config.workspace.join("src-js/a.js/blocker")).unwrap();
        config.delete_original = true;

        let summary = run(&config);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Failed(ConvertError::Write { .. })
        ));
        assert!(config.workspace.join("src/a.ts").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, mut config) = workspace();
        write(&config, "src/a.ts", "const a: string = 'a';\n");
        config.dry_run = true;
        config.delete_original = true;

        let summary = run(&config);
        assert_eq!(summary.would_convert(), 1);
        assert!(!config.workspace.join("src-js").exists());
        assert!(config.workspace.join("src/a.ts").exists());
    }

    #[test]
    fn test_strict_mode_fails_unparsable_files() {
        let (_dir, mut config) = workspace();
        write(&config, "src/bad.ts", "interface A { a: string }\nconst x = (;\n");
        write(&config, "src/good.ts", "const y: number = 2;\n");

        let summary = run(&config);
        assert!(summary.is_success());
        assert!(summary.reports[0].used_fallback);
        assert_eq!(read(&config, "src-js/bad.js"), "const x = (;\n");

        fs::remove_dir_all(config.workspace.join("src-js")).unwrap();
        config.strict = true;
        let summary = run(&config);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.reports[0].outcome,
            Outcome::Failed(ConvertError::Parse { line: 2, .. })
        ));
        assert!(!config.workspace.join("src-js/bad.js").exists());
        assert_eq!(read(&config, "src-js/good.js"), "const y = 2;\n");
    }

    #[test]
    fn test_colliding_destinations() {
        let (_dir, mut config) = workspace();
        write(&config, "a/x.ts", "");
        write(&config, "b/x.ts", "");
        config.source_roots = vec![config.workspace.join("a"), config.workspace.join("b")];
        config.destination_root = Some(config.workspace.join("out"));

        let summary = run(&config);
        assert_eq!(summary.converted(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.reports[1].outcome,
            Outcome::Failed(ConvertError::Collision { .. })
        ));
    }

    #[test]
    fn test_single_file_outside_roots() {
        let (_dir, config) = workspace();
        write(&config, "scripts/build.ts", "const n: number = 1;\n");

        let summary = convert_single(Utf8Path::new("scripts/build.ts"), &config).unwrap();
        assert!(summary.is_success());
        assert_eq!(read(&config, "scripts/build.js"), "const n = 1;\n");
    }

    #[test]
    fn test_single_file_under_root_is_rebased() {
        let (_dir, config) = workspace();
        write(&config, "src/ui/Button.tsx", "export const B = (x: P) => x;\n");

        convert_single(Utf8Path::new("src/ui/Button.tsx"), &config).unwrap();
        assert_eq!(read(&config, "src-js/ui/Button.jsx"), "export const B = (x) => x;\n");
    }

    #[test]
    fn test_single_file_errors() {
        let (_dir, config) = workspace();
        write(&config, "README.md", "# hi\n");
        assert!(matches!(
            strip_single(Utf8Path::new("nope.ts"), &config),
            Err(DriverError::NotFound(_))
        ));
        assert!(matches!(
            strip_single(Utf8Path::new("README.md"), &config),
            Err(DriverError::NotEligible(_))
        ));
    }
}
