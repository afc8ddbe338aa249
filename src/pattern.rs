use crate::error::{Result, SyncError};
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Component, Path, MAIN_SEPARATOR};

/// One compiled `--exclude` pattern.
#[derive(Debug, Clone)]
struct ExcludePattern {
    glob: GlobMatcher,
    segments: Vec<String>,
    dir_only: bool,
    anchored: bool,
}

impl ExcludePattern {
    fn compile(raw: &str) -> Result<Option<Self>> {
        let trimmed = raw.trim_end_matches(|c: char| c == '/' || c == MAIN_SEPARATOR);
        let dir_only = trimmed.len() != raw.len();
        let anchored = trimmed.starts_with(|c: char| c == '/' || c == MAIN_SEPARATOR);

        let segments: Vec<String> = trimmed
            .split(|c: char| c == '/' || c == MAIN_SEPARATOR)
            .filter(|s| !s.is_empty() && *s != ".")
            .map(String::from)
            .collect();
        if segments.is_empty() {
            return Ok(None);
        }

        let glob = GlobBuilder::new(trimmed)
            .literal_separator(true)
            .build()
            .map_err(|e| SyncError::InvalidPattern {
                pattern: raw.to_string(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();

        Ok(Some(Self {
            glob,
            segments,
            dir_only,
            anchored,
        }))
    }

    fn matches(&self, path: &[String], is_dir: bool) -> bool {
        let Some(base) = path.last() else {
            return false;
        };
        // Rules that look at the entry itself honour the trailing-slash form.
        let entry_may_match = !self.dir_only || is_dir;
        let n = self.segments.len();

        // 1. glob against the base name
        if !self.anchored && entry_may_match && self.glob.is_match(base) {
            return true;
        }
        // 2. the whole relative path
        if entry_may_match && path == self.segments.as_slice() {
            return true;
        }
        // 3. an ancestor prefix
        if path.len() > n && path[..n] == self.segments[..] {
            return true;
        }
        // A leading separator pins the pattern to the tree root.
        if self.anchored {
            return false;
        }
        // 4. any run of components further in
        path.windows(n).enumerate().any(|(i, window)| {
            window == self.segments.as_slice() && (i + n < path.len() || entry_may_match)
        })
    }
}

/// A compiled set of exclude patterns.
///
/// A relative path is excluded when any pattern matches it by base-name glob,
/// by exact equality, as a leading directory, or as a directory anywhere
/// inside the path. A pattern ending in `/` only matches directories, and one
/// starting with `/` only matches at the tree root.
///
/// ```rust
/// use std::path::Path;
/// use syncdir::pattern::ExcludeSet;
///
/// let excludes = ExcludeSet::new(&["node_modules", "*.tmp"]).unwrap();
/// assert!(excludes.is_excluded(Path::new("web/node_modules/react/index.js"), false));
/// assert!(excludes.is_excluded(Path::new("cache/x.tmp"), false));
/// assert!(!excludes.is_excluded(Path::new("src/main.rs"), false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<ExcludePattern>,
}

impl ExcludeSet {
    /// Compiles the patterns in order. Empty patterns are ignored; a malformed
    /// glob is a usage error.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            if let Some(pattern) = ExcludePattern::compile(raw.as_ref())? {
                compiled.push(pattern);
            }
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let segments = path_segments(relative);
        self.patterns.iter().any(|p| p.matches(&segments, is_dir))
    }
}

/// One-shot form of [`ExcludeSet::is_excluded`] for callers holding raw patterns.
pub fn is_excluded<S: AsRef<str>>(relative: &Path, is_dir: bool, patterns: &[S]) -> Result<bool> {
    Ok(ExcludeSet::new(patterns)?.is_excluded(relative, is_dir))
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
