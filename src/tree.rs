use crate::error::{IoResultExt, Result};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// A path inside a synchronized tree, both relative to the tree root and absolute.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub struct EntryPath {
    pub relative: PathBuf,
    pub absolute: PathBuf,
}

impl EntryPath {
    pub fn new(relative: PathBuf, absolute: PathBuf) -> Self {
        Self { relative, absolute }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// What the engine knows about one file or directory while walking a tree.
/// Rebuilt from the live filesystem on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: EntryPath,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: SystemTime,
}

impl TreeEntry {
    pub fn from_metadata(path: EntryPath, metadata: &fs::Metadata) -> Result<Self> {
        let modified = metadata
            .modified()
            .at("read modification time of", &path.absolute)?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Ok(Self {
            path,
            kind,
            size: metadata.len(),
            modified,
        })
    }

    /// Stat `absolute` (following symlinks) and describe it.
    pub fn stat(relative: &Path, absolute: &Path) -> Result<Self> {
        let metadata = fs::metadata(absolute).at("inspect", absolute)?;
        Self::from_metadata(
            EntryPath::new(relative.to_path_buf(), absolute.to_path_buf()),
            &metadata,
        )
    }
}

/// Outcome for one SOURCE entry in the copy pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Destination directory is missing and gets created.
    CreateDir,
    /// Destination file is missing, not a regular file, or differs.
    CopyNeeded,
    /// Destination already matches; nothing to do.
    SkipIdentical,
    /// Matched an exclude pattern; a directory's subtree is skipped too.
    Excluded,
}

/// Outcome for one DESTINATION entry in the deletion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorDecision {
    Keep,
    DeleteFile,
    DeleteDir,
    Excluded,
}

impl fmt::Display for SyncDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDecision::CreateDir => write!(f, "mkdir"),
            SyncDecision::CopyNeeded => write!(f, "copy"),
            SyncDecision::SkipIdentical => write!(f, "skip"),
            SyncDecision::Excluded => write!(f, "exclude"),
        }
    }
}

impl fmt::Display for MirrorDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorDecision::Keep => write!(f, "keep"),
            MirrorDecision::DeleteFile => write!(f, "delete"),
            MirrorDecision::DeleteDir => write!(f, "delete dir"),
            MirrorDecision::Excluded => write!(f, "mirror-skip (excluded)"),
        }
    }
}
