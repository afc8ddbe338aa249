//! How the engine tells its caller what it decided and did.

use crate::tree::{MirrorDecision, SyncDecision};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Receives one call per decision, in traversal order. Paths are relative to
/// the tree root; the destination root itself is reported as an empty path.
///
/// Calls happen before the corresponding change is made, so a failing copy or
/// delete has already been announced when the error comes back.
pub trait Reporter {
    fn source_entry(&mut self, relative: &Path, decision: SyncDecision);
    fn mirror_entry(&mut self, relative: &Path, decision: MirrorDecision);
}

/// Narrates decisions through `tracing`, the way the command line prints them.
///
/// Changes are printed when `verbose` or `dry_run` is set; skips and
/// exclusions only when `verbose` is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    verbose: bool,
    dry_run: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool, dry_run: bool) -> Self {
        Self { verbose, dry_run }
    }

    fn emit(&self, verb: &dyn fmt::Display, relative: &Path) {
        let shown = if relative.as_os_str().is_empty() {
            Path::new(".")
        } else {
            relative
        };
        if self.dry_run {
            tracing::info!("[DRY-RUN] {verb}: {}", shown.display());
        } else {
            tracing::info!("{verb}: {}", shown.display());
        }
    }
}

impl Reporter for ConsoleReporter {
    fn source_entry(&mut self, relative: &Path, decision: SyncDecision) {
        let wanted = match decision {
            SyncDecision::CreateDir | SyncDecision::CopyNeeded => self.verbose || self.dry_run,
            SyncDecision::SkipIdentical | SyncDecision::Excluded => self.verbose,
        };
        if wanted {
            self.emit(&decision, relative);
        }
    }

    fn mirror_entry(&mut self, relative: &Path, decision: MirrorDecision) {
        let wanted = match decision {
            MirrorDecision::DeleteFile | MirrorDecision::DeleteDir => self.verbose || self.dry_run,
            MirrorDecision::Excluded => self.verbose,
            MirrorDecision::Keep => false,
        };
        if wanted {
            self.emit(&decision, relative);
        }
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Source(PathBuf, SyncDecision),
    Mirror(PathBuf, MirrorDecision),
}

/// Keeps every decision in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths that received `decision` in the copy pass.
    pub fn source_paths(&self, decision: SyncDecision) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Source(path, d) if *d == decision => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    /// Relative paths that received `decision` in the deletion pass.
    pub fn mirror_paths(&self, decision: MirrorDecision) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Mirror(path, d) if *d == decision => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn source_entry(&mut self, relative: &Path, decision: SyncDecision) {
        self.events
            .push(Event::Source(relative.to_path_buf(), decision));
    }

    fn mirror_entry(&mut self, relative: &Path, decision: MirrorDecision) {
        self.events
            .push(Event::Mirror(relative.to_path_buf(), decision));
    }
}

/// Counters for one completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub dirs_created: u64,
    pub files_copied: u64,
    pub files_skipped: u64,
    pub excluded: u64,
    pub files_deleted: u64,
    pub dirs_deleted: u64,
}

impl SyncSummary {
    pub(crate) fn record_source(&mut self, decision: SyncDecision, is_dir: bool) {
        match decision {
            SyncDecision::CreateDir => self.dirs_created += 1,
            SyncDecision::CopyNeeded => self.files_copied += 1,
            SyncDecision::SkipIdentical if !is_dir => self.files_skipped += 1,
            SyncDecision::SkipIdentical => {}
            SyncDecision::Excluded => self.excluded += 1,
        }
    }

    pub(crate) fn record_mirror(&mut self, decision: MirrorDecision) {
        match decision {
            MirrorDecision::DeleteFile => self.files_deleted += 1,
            MirrorDecision::DeleteDir => self.dirs_deleted += 1,
            MirrorDecision::Excluded => self.excluded += 1,
            MirrorDecision::Keep => {}
        }
    }

    /// Number of create, copy and delete actions.
    pub fn changes(&self) -> u64 {
        self.dirs_created + self.files_copied + self.files_deleted + self.dirs_deleted
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} copied={} skipped={} excluded={} deleted={} deleted_dirs={}",
            self.dirs_created,
            self.files_copied,
            self.files_skipped,
            self.excluded,
            self.files_deleted,
            self.dirs_deleted
        )
    }
}
