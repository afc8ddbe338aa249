use std::{io, path::PathBuf};

/// Process exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Process exit code when the synchronization failed part way through.
pub const EXIT_RUNTIME: i32 = 1;
/// Process exit code when the invocation was rejected before touching anything.
pub const EXIT_USAGE: i32 = 2;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Everything that can stop a synchronization.
///
/// Variants fall into two groups. Usage errors are raised by the pre-flight
/// checks before any filesystem mutation. Runtime errors come from the
/// filesystem while a pass is running; the first one aborts the run and
/// whatever was already copied or deleted stays that way.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("SRC does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("SRC is a directory; specify -r for recursive copy: {}", .0.display())]
    RecursionRequired(PathBuf),

    #[error("SRC and DST are the same path:\n  {}", .0.display())]
    SamePath(PathBuf),

    #[error(
        "DST is inside SRC; refused to prevent recursion:\n  DST={} inside SRC={}",
        dst.display(),
        src.display()
    )]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    #[error(
        "SRC is inside DST; refused to prevent recursion:\n  SRC={} inside DST={}",
        src.display(),
        dst.display()
    )]
    SourceInsideDestination { src: PathBuf, dst: PathBuf },

    #[error("invalid exclude pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("failed to load config profile: {0:#}")]
    Profile(anyhow::Error),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl SyncError {
    /// True for errors detected before any side effect took place.
    pub fn is_usage(&self) -> bool {
        !matches!(self, SyncError::Io { .. } | SyncError::Walk(_))
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_RUNTIME
        }
    }
}

/// Attach the failing path and action to an `io::Result`.
pub trait IoResultExt<T> {
    fn at(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, action: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| SyncError::Io {
            action,
            path: path.into(),
            source,
        })
    }
}
