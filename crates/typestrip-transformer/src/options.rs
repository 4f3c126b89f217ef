//! Transformation options and the typed-to-untyped extension map.

use indexmap::IndexMap;
use std::path::Path;
use swc_ecma_parser::{Syntax, TsSyntax};

/// The dialect a source file is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// TypeScript without JSX (`.ts`, `.mts`, `.cts`). Allows `<T>expr` assertions.
    Ts,
    /// TypeScript with JSX (`.tsx`). Plain `.js`/`.jsx` input also parses as this.
    #[default]
    Tsx,
}

impl SourceKind {
    /// Picks the dialect from a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Self::Ts),
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Picks the dialect from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::from_extension(ext)
    }

    pub(crate) fn syntax(self) -> Syntax {
        Syntax::Typescript(TsSyntax {
            tsx: self == Self::Tsx,
            decorators: true,
            no_early_errors: true,
            ..Default::default()
        })
    }
}

/// Ordered mapping from typed extensions to their untyped counterparts.
///
/// Extensions are stored without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap {
    entries: IndexMap<String, String>,
}

impl Default for ExtensionMap {
    fn default() -> Self {
        [("tsx", "jsx"), ("ts", "js"), ("mts", "mjs"), ("cts", "cjs")]
            .into_iter()
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtensionMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(from, to)| (trim_dot(from.into()), trim_dot(to.into())))
            .filter(|(from, _)| !from.is_empty())
            .collect();
        Self { entries }
    }
}

fn trim_dot(ext: String) -> String {
    match ext.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => ext,
    }
}

impl ExtensionMap {
    /// Returns the untyped extension for a typed one.
    pub fn map_extension(&self, ext: &str) -> Option<&str> {
        self.entries.get(ext).map(String::as_str)
    }

    /// Returns true if files with this extension are converted.
    pub fn is_eligible_extension(&self, ext: &str) -> bool {
        self.entries.contains_key(ext)
    }

    /// Returns the number of mapped extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no extension is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the typed extension a path ends with.
    ///
    /// Returns the byte offset of the extension (after the dot) and its
    /// untyped replacement. Longer extensions win over shorter ones.
    pub fn match_suffix<'a>(&'a self, path: &str) -> Option<(usize, &'a str)> {
        self.entries
            .iter()
            .filter(|(from, _)| {
                path.len() > from.len() + 1
                    && path.ends_with(from.as_str())
                    && path.as_bytes()[path.len() - from.len() - 1] == b'.'
            })
            .max_by_key(|(from, _)| from.len())
            .map(|(from, to)| (path.len() - from.len(), to.as_str()))
    }
}

/// Options for [`transform`](crate::transform).
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// The dialect to parse the input as.
    pub kind: SourceKind,
    /// Typed extensions and their replacements, used for module specifiers.
    pub extension_map: ExtensionMap,
    /// Also drop named imports that are only ever used as types.
    pub elide_type_only_imports: bool,
    /// Convert CRLF line endings to LF in the output.
    pub normalize_line_endings: bool,
    /// Remove `/** ... */` comments attached to removed type declarations.
    pub remove_type_doc_comments: bool,
    /// The filename, used in parser diagnostics.
    pub filename: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            extension_map: ExtensionMap::default(),
            elide_type_only_imports: false,
            normalize_line_endings: false,
            remove_type_doc_comments: true,
            filename: None,
        }
    }
}

impl TransformOptions {
    /// Options for a file at `path`, with the dialect taken from its extension.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            kind: SourceKind::from_path(path).unwrap_or_default(),
            filename: Some(path.display().to_string()),
            ..Default::default()
        }
    }
}
