//! Configuration loading.
//!
//! Settings come from three layers: built-in defaults, an optional
//! `typestrip.json` in the workspace, and command-line flags. Later layers
//! win. The merged result is a [`ConvertConfig`] that the orchestrator
//! receives explicitly.

use crate::cli::Args;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use source_edit::LineIndex;
use std::fs;
use thiserror::Error;
use typestrip_transformer::{ExtensionMap, SourceKind, TransformOptions};

/// Name of the configuration file looked up in the workspace.
pub const CONFIG_FILE_NAME: &str = "typestrip.json";

const DEFAULT_SOURCE_ROOT: &str = "src";
const DEFAULT_DESTINATION_ROOT: &str = "src-js";
const DEFAULT_EXCLUDED_DIRS: [&str; 4] = ["node_modules", ".git", ".next", "dist"];

/// Configuration errors. All of them abort the run.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The current directory is unavailable.
    #[error("cannot determine the current directory")]
    #[diagnostic(code(typestrip::config::workspace))]
    CurrentDir(#[source] std::io::Error),

    /// The workspace path is not UTF-8.
    #[error("workspace path is not valid UTF-8: {0}")]
    #[diagnostic(code(typestrip::config::workspace))]
    NonUtf8Workspace(String),

    /// The config file could not be read.
    #[error("failed to read {path}")]
    #[diagnostic(code(typestrip::config::read))]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON or has unexpected keys.
    #[error("invalid configuration in {path}: {message}")]
    #[diagnostic(
        code(typestrip::config::parse),
        help("typestrip.json is JSON with optional comments and camelCase keys, such as sourceRoots or extensionMap")
    )]
    Parse {
        path: Utf8PathBuf,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    /// An ignore pattern is not a valid glob.
    #[error("invalid ignore pattern `{pattern}`")]
    #[diagnostic(code(typestrip::config::ignore))]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// `sourceRoots` was given as an empty list.
    #[error("no source roots configured")]
    #[diagnostic(
        code(typestrip::config::source_roots),
        help("list at least one directory in sourceRoots or pass --src")
    )]
    NoSourceRoots,

    /// `extensionMap` was given without entries.
    #[error("the extension map is empty")]
    #[diagnostic(
        code(typestrip::config::extension_map),
        help("map at least one typed extension to its untyped counterpart, such as ts to js")
    )]
    EmptyExtensionMap,
}

/// How existing destination files are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum WriteMode {
    /// Always rewrite the destination.
    #[default]
    #[serde(rename = "always")]
    Overwrite,
    /// Leave the destination alone when its bytes already match.
    #[serde(rename = "ifChanged")]
    SkipUnchanged,
}

/// The contents of `typestrip.json`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub source_roots: Option<Vec<Utf8PathBuf>>,
    pub destination_root: Option<Utf8PathBuf>,
    pub in_place: Option<bool>,
    pub excluded_directory_names: Option<Vec<String>>,
    pub delete_original_after_conversion: Option<bool>,
    pub extension_map: Option<IndexMap<String, String>>,
    pub overwrite: Option<WriteMode>,
    pub ignore: Option<Vec<String>>,
    pub elide_type_only_imports: Option<bool>,
    pub normalize_line_endings: Option<bool>,
    pub skip_declaration_files: Option<bool>,
    pub strict: Option<bool>,
}

impl FileConfig {
    /// Loads configuration from a JSON file that may contain comments.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        let cleaned = remove_json_comments(&content);
        if cleaned.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&cleaned).map_err(|err| {
            let offset = error_offset(&cleaned, err.line(), err.column());
            ConfigError::Parse {
                path: path.to_owned(),
                message: err.to_string(),
                src: NamedSource::new(path.as_str(), content),
                span: (offset, 0).into(),
            }
        })
    }

    /// Loads `typestrip.json` from the workspace if it exists.
    pub fn find(workspace: &Utf8Path) -> Result<Option<Self>, ConfigError> {
        let path = workspace.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Everything a conversion run needs, resolved to absolute paths.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory that relative paths and report paths are based on.
    pub workspace: Utf8PathBuf,
    /// Directories walked for typed sources.
    pub source_roots: Vec<Utf8PathBuf>,
    /// Where outputs go; `None` writes each output next to its source.
    pub destination_root: Option<Utf8PathBuf>,
    /// Directory basenames never descended into.
    pub excluded_dirs: Vec<String>,
    /// Files to skip, matched against the path relative to its root.
    pub ignore: GlobSet,
    pub delete_original: bool,
    pub extension_map: ExtensionMap,
    pub write_mode: WriteMode,
    /// Parse failures fail the file instead of falling back.
    pub strict: bool,
    pub dry_run: bool,
    pub elide_type_only_imports: bool,
    pub normalize_line_endings: bool,
    /// Skip `.d.ts` style declaration files.
    pub skip_declaration_files: bool,
}

impl ConvertConfig {
    /// The default configuration for a workspace: `src` into `src-js`.
    pub fn defaults(workspace: Utf8PathBuf) -> Self {
        Self {
            source_roots: vec![workspace.join(DEFAULT_SOURCE_ROOT)],
            destination_root: Some(workspace.join(DEFAULT_DESTINATION_ROOT)),
            workspace,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore: GlobSet::empty(),
            delete_original: false,
            extension_map: ExtensionMap::default(),
            write_mode: WriteMode::default(),
            strict: false,
            dry_run: false,
            elide_type_only_imports: false,
            normalize_line_endings: false,
            skip_declaration_files: true,
        }
    }

    /// Resolves the configuration from flags and the workspace config file.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let workspace = absolute_workspace(&args.workspace)?;
        let file = match &args.config {
            Some(path) => FileConfig::load(&workspace.join(path))?,
            None => FileConfig::find(&workspace)?.unwrap_or_default(),
        };
        Self::merge(workspace, file, args)
    }

    /// Layers the config file and then the flags over the defaults.
    fn merge(workspace: Utf8PathBuf, file: FileConfig, args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::defaults(workspace.clone());
        let resolve = |path: &Utf8Path| normalize(&workspace.join(path));

        let roots = if args.src.is_empty() {
            file.source_roots
        } else {
            Some(args.src.clone())
        };
        if let Some(roots) = roots {
            if roots.is_empty() {
                return Err(ConfigError::NoSourceRoots);
            }
            config.source_roots = roots.iter().map(|root| resolve(root.as_path())).collect();
        }

        if args.in_place {
            config.destination_root = None;
        } else if let Some(out) = &args.out {
            config.destination_root = Some(resolve(out.as_path()));
        } else if file.in_place.unwrap_or(false) {
            config.destination_root = None;
        } else if let Some(destination) = &file.destination_root {
            config.destination_root = Some(resolve(destination.as_path()));
        }

        if let Some(names) = file.excluded_directory_names {
            config.excluded_dirs = names;
        }
        for name in &args.exclude {
            if !config.excluded_dirs.contains(name) {
                config.excluded_dirs.push(name.clone());
            }
        }

        let patterns: Vec<String> = file
            .ignore
            .unwrap_or_default()
            .into_iter()
            .chain(args.ignore.iter().cloned())
            .collect();
        config.ignore = build_ignore_set(&patterns)?;

        if let Some(map) = file.extension_map {
            config.extension_map = map.into_iter().collect();
            if config.extension_map.is_empty() {
                return Err(ConfigError::EmptyExtensionMap);
            }
        }

        config.write_mode = if args.skip_unchanged {
            WriteMode::SkipUnchanged
        } else {
            file.overwrite.unwrap_or_default()
        };
        config.delete_original =
            args.delete_original || file.delete_original_after_conversion.unwrap_or(false);
        config.strict = args.strict || file.strict.unwrap_or(false);
        config.dry_run = args.dry_run;
        config.elide_type_only_imports =
            args.elide_type_imports || file.elide_type_only_imports.unwrap_or(false);
        config.normalize_line_endings = args.lf || file.normalize_line_endings.unwrap_or(false);
        if let Some(skip) = file.skip_declaration_files {
            config.skip_declaration_files = skip;
        }

        Ok(config)
    }

    /// Transformer options for one source file.
    pub fn transform_options(&self, path: &Utf8Path) -> TransformOptions {
        TransformOptions {
            kind: SourceKind::from_path(path).unwrap_or_default(),
            extension_map: self.extension_map.clone(),
            elide_type_only_imports: self.elide_type_only_imports,
            normalize_line_endings: self.normalize_line_endings,
            filename: Some(path.to_string()),
            ..Default::default()
        }
    }

    /// `path` relative to the workspace, for display.
    pub fn display_path<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        path.strip_prefix(&self.workspace).unwrap_or(path)
    }
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

fn absolute_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    if workspace.is_absolute() {
        return Ok(normalize(workspace));
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|e| ConfigError::NonUtf8Workspace(e.into_path_buf().display().to_string()))?;
    Ok(normalize(&cwd.join(workspace)))
}

/// Lexically removes `.` and `..` components.
pub(crate) fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

/// Byte offset of a 1-based serde_json error position.
fn error_offset(text: &str, line: usize, column: usize) -> usize {
    let index = LineIndex::new(text);
    let line_start = line
        .checked_sub(1)
        .and_then(|line| index.line_start(line as u32))
        .map_or(0, |start| u32::from(start) as usize);
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// Blanks out single-line and multi-line comments in JSON.
///
/// Comment bytes become spaces and line breaks survive, so offsets in the
/// result still point into the original text.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' && chars.peek() == Some(&'/') {
            result.push(' ');
            while let Some(&next) = chars.peek() {
                if next == '\n' {
                    break;
                }
                blank(&mut result, next);
                chars.next();
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            result.push(' ');
            chars.next();
            result.push(' ');
            while let Some(next) = chars.next() {
                blank(&mut result, next);
                if next == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    result.push(' ');
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

fn blank(out: &mut String, c: char) {
    match c {
        '\n' | '\r' => out.push(c),
        _ => out.extend(std::iter::repeat(' ').take(c.len_utf8())),
    }
}
