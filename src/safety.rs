//! Pre-flight checks that run before anything is written.

use crate::{
    config::SyncConfig,
    error::{IoResultExt, Result, SyncError},
    pattern::ExcludeSet,
};
use std::{
    env, fs, io,
    path::{Component, Path, PathBuf},
};

/// Lexically normalise a path: drop `.` components and fold `..` into its
/// parent. Symlinks are not resolved.
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use syncdir::safety::clean;
///
/// assert_eq!(clean(Path::new("/data/./a/../a/b/")), PathBuf::from("/data/a/b"));
/// assert_eq!(clean(Path::new("a/../../b")), PathBuf::from("../b"));
/// ```
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.into_iter().collect()
}

/// Resolve `path` against the current directory and clean it.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    Ok(clean(&env::current_dir()?.join(path)))
}

/// Components folded to lower case; the comparisons below treat paths as
/// case-insensitive.
fn folded(path: &Path) -> Vec<String> {
    clean(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .collect()
}

/// True when both paths name the same location.
pub fn same_path(a: &Path, b: &Path) -> bool {
    folded(a) == folded(b)
}

/// True when `child` lies strictly below `parent`, comparing whole components
/// so that `/src2` is not inside `/src`.
pub fn is_subpath(child: &Path, parent: &Path) -> bool {
    let child = folded(child);
    let parent = folded(parent);
    child.len() > parent.len() && child[..parent.len()] == parent[..]
}

/// Reject SOURCE/DESTINATION pairs that would copy into themselves or let the
/// deletion pass eat the source. Both paths must already be absolute.
pub fn validate_paths(src: &Path, dst: &Path) -> Result<()> {
    if same_path(src, dst) {
        return Err(SyncError::SamePath(clean(src)));
    }
    if is_subpath(dst, src) {
        return Err(SyncError::DestinationInsideSource {
            src: clean(src),
            dst: clean(dst),
        });
    }
    if is_subpath(src, dst) {
        return Err(SyncError::SourceInsideDestination {
            src: clean(src),
            dst: clean(dst),
        });
    }
    Ok(())
}

/// A source/destination pair that passed every pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approved {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_is_dir: bool,
}

/// All checks the command line runs before handing over to the engine:
/// SOURCE exists, a directory SOURCE needs `recursive`, the exclude patterns
/// compile, and the absolute pair passes [`validate_paths`].
pub fn preflight(src: &Path, dst: &Path, config: &SyncConfig) -> Result<Approved> {
    let metadata = match fs::metadata(src) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SyncError::SourceMissing(src.to_path_buf()))
        }
        Err(source) => {
            return Err(SyncError::Io {
                action: "inspect",
                path: src.to_path_buf(),
                source,
            })
        }
    };
    if metadata.is_dir() && !config.recursive {
        return Err(SyncError::RecursionRequired(src.to_path_buf()));
    }

    ExcludeSet::new(&config.exclude_patterns)?;

    let source = absolutize(src).at("resolve", src)?;
    let destination = absolutize(dst).at("resolve", dst)?;
    validate_paths(&source, &destination)?;

    Ok(Approved {
        source,
        destination,
        source_is_dir: metadata.is_dir(),
    })
}
