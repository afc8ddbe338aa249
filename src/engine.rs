//! The two-pass synchronization engine.
//!
//! Pass one walks SOURCE and brings every non-excluded entry over to
//! DESTINATION. Pass two, in mirror mode only, walks DESTINATION afresh and
//! removes whatever SOURCE no longer has. Both passes see excluded paths as
//! if they did not exist.
//!
//! The engine assumes nobody else modifies either tree while it runs.

use crate::{
    compare,
    config::SyncConfig,
    copy,
    error::{IoResultExt, Result},
    pattern::ExcludeSet,
    report::{Reporter, SyncSummary},
    tree::{EntryPath, MirrorDecision, SyncDecision, TreeEntry},
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;
use walkdir::WalkDir;

/// Synchronize the directory `source` into `destination`.
///
/// Both paths must be absolute and already approved by
/// [`crate::safety::validate_paths`]. The first filesystem error aborts the
/// run; nothing done before it is rolled back.
pub fn sync_dir(
    source: &Path,
    destination: &Path,
    config: &SyncConfig,
    reporter: &mut dyn Reporter,
) -> Result<SyncSummary> {
    let mut syncer = Syncer::new(source, destination, config, reporter)?;
    syncer.copy_pass()?;
    if config.mirror {
        syncer.mirror_pass()?;
    }
    Ok(syncer.summary)
}

/// Synchronize a single file. When `destination` is an existing directory the
/// file lands inside it under its own name.
pub fn sync_file(
    source: &Path,
    destination: &Path,
    config: &SyncConfig,
    reporter: &mut dyn Reporter,
) -> Result<SyncSummary> {
    let name = source.file_name().map(PathBuf::from).unwrap_or_default();
    let into_dir = match fs::metadata(destination) {
        Ok(metadata) => metadata.is_dir(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e).at("inspect", destination),
    };
    let target = if into_dir {
        destination.join(&name)
    } else {
        destination.to_path_buf()
    };

    let mut syncer = Syncer::new(source, destination, config, reporter)?;
    let entry = TreeEntry::stat(&name, source)?;
    syncer.sync_one_file(&entry, &target)?;
    Ok(syncer.summary)
}

/// Path of a walked entry relative to the root it was walked from.
fn relative_to<'p>(path: &'p Path, root: &Path) -> Result<&'p Path> {
    path.strip_prefix(root)
        .map_err(io::Error::other)
        .at("resolve", path)
}

/// Turn the result of probing SOURCE for a DESTINATION entry's counterpart
/// into a decision. Only a missing counterpart means delete; any other probe
/// failure aborts the run.
fn mirror_verdict(
    probe: io::Result<fs::Metadata>,
    counterpart: &Path,
    is_dir: bool,
) -> Result<MirrorDecision> {
    match probe {
        Ok(_) => Ok(MirrorDecision::Keep),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(if is_dir {
            MirrorDecision::DeleteDir
        } else {
            MirrorDecision::DeleteFile
        }),
        Err(e) => Err(e).at("inspect", counterpart),
    }
}

struct Syncer<'a> {
    source: &'a Path,
    destination: &'a Path,
    config: &'a SyncConfig,
    excludes: ExcludeSet,
    reporter: &'a mut dyn Reporter,
    summary: SyncSummary,
}

impl<'a> Syncer<'a> {
    fn new(
        source: &'a Path,
        destination: &'a Path,
        config: &'a SyncConfig,
        reporter: &'a mut dyn Reporter,
    ) -> Result<Self> {
        Ok(Self {
            source,
            destination,
            config,
            excludes: ExcludeSet::new(&config.exclude_patterns)?,
            reporter,
            summary: SyncSummary::default(),
        })
    }

    fn note_source(&mut self, relative: &Path, decision: SyncDecision, is_dir: bool) {
        self.reporter.source_entry(relative, decision);
        self.summary.record_source(decision, is_dir);
    }

    fn note_mirror(&mut self, relative: &Path, decision: MirrorDecision) {
        self.reporter.mirror_entry(relative, decision);
        self.summary.record_mirror(decision);
    }

    fn copy_pass(&mut self) -> Result<()> {
        debug!(
            "copy pass: {} -> {}",
            self.source.display(),
            self.destination.display()
        );
        let mut walker = WalkDir::new(self.source).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            if entry.depth() == 0 {
                self.sync_dir_entry(Path::new(""), self.destination)?;
                continue;
            }
            let relative = relative_to(entry.path(), self.source)?;
            let is_dir = entry.file_type().is_dir();

            if self.excludes.is_excluded(relative, is_dir) {
                if is_dir {
                    walker.skip_current_dir();
                }
                self.note_source(relative, SyncDecision::Excluded, is_dir);
                continue;
            }

            let target = self.destination.join(relative);
            if is_dir {
                self.sync_dir_entry(relative, &target)?;
            } else {
                let source_entry = TreeEntry::stat(relative, entry.path())?;
                self.sync_one_file(&source_entry, &target)?;
            }
        }
        Ok(())
    }

    fn sync_dir_entry(&mut self, relative: &Path, target: &Path) -> Result<()> {
        let decision = if copy::ensure_dir(target, self.config.dry_run)? {
            SyncDecision::CreateDir
        } else {
            SyncDecision::SkipIdentical
        };
        self.note_source(relative, decision, true);
        Ok(())
    }

    fn plan_file(&self, source: &TreeEntry, target: &Path) -> Result<SyncDecision> {
        let metadata = match fs::metadata(target) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SyncDecision::CopyNeeded),
            Err(e) => return Err(e).at("inspect", target),
        };
        if !metadata.is_file() {
            return Ok(SyncDecision::CopyNeeded);
        }
        let dest = TreeEntry::from_metadata(
            EntryPath::new(source.path.relative.clone(), target.to_path_buf()),
            &metadata,
        )?;
        if compare::are_equivalent(source, &dest, self.config.use_checksum)? {
            Ok(SyncDecision::SkipIdentical)
        } else {
            Ok(SyncDecision::CopyNeeded)
        }
    }

    fn sync_one_file(&mut self, source: &TreeEntry, target: &Path) -> Result<()> {
        let decision = self.plan_file(source, target)?;
        self.note_source(&source.path.relative, decision, false);
        if decision == SyncDecision::CopyNeeded {
            copy::copy_file(&source.path.absolute, target, self.config.dry_run)?;
        }
        Ok(())
    }

    fn plan_mirror(&self, relative: &Path, is_dir: bool) -> Result<MirrorDecision> {
        if self.excludes.is_excluded(relative, is_dir) {
            return Ok(MirrorDecision::Excluded);
        }
        let counterpart = self.source.join(relative);
        let probe = fs::symlink_metadata(&counterpart);
        mirror_verdict(probe, &counterpart, is_dir)
    }

    fn mirror_pass(&mut self) -> Result<()> {
        if self.config.dry_run && !self.destination.exists() {
            debug!(
                "mirror pass: {} does not exist yet, nothing to delete",
                self.destination.display()
            );
            return Ok(());
        }
        debug!("mirror pass: {}", self.destination.display());
        let mut walker = WalkDir::new(self.destination)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let relative = relative_to(entry.path(), self.destination)?;
            let is_dir = entry.file_type().is_dir();
            let decision = self.plan_mirror(relative, is_dir)?;

            // Never look inside a directory that is excluded or about to go.
            if is_dir && decision != MirrorDecision::Keep {
                walker.skip_current_dir();
            }
            self.note_mirror(relative, decision);
            if matches!(
                decision,
                MirrorDecision::DeleteFile | MirrorDecision::DeleteDir
            ) {
                copy::remove_path(entry.path(), is_dir, self.config.dry_run)?;
            }
        }
        Ok(())
    }
}
