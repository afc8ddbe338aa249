use anyhow::{Context, Result};
use ron::{extensions::Extensions, Options};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Options for one synchronization run.
///
/// Built once by the command line and handed to the engine; the engine never
/// changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Descend into directories. Required when SOURCE is a directory.
    pub recursive: bool,
    /// Delete DESTINATION entries that have no SOURCE counterpart.
    pub mirror: bool,
    /// Decide and report everything, change nothing.
    pub dry_run: bool,
    /// Narrate skips and exclusions as well as changes.
    pub verbose: bool,
    /// Compare content digests instead of trusting size and mtime.
    pub use_checksum: bool,
    /// Exclude patterns, checked in order.
    pub exclude_patterns: Vec<String>,
}

impl SyncConfig {
    /// Fold a profile into options taken from the command line. Profile
    /// excludes come first; a boolean is on if either side turns it on.
    pub fn with_profile(mut self, profile: &Profile) -> Self {
        let mut patterns = profile.excludes.clone();
        patterns.append(&mut self.exclude_patterns);
        self.exclude_patterns = patterns;

        self.mirror |= profile.mirror.unwrap_or(false);
        self.use_checksum |= profile.checksum.unwrap_or(false);
        self.verbose |= profile.verbose.unwrap_or(false);
        self
    }
}

/// Defaults read from a RON file, e.g.
///
/// ```ron
/// (
///     excludes: [".git", "*.tmp", "node_modules"],
///     mirror: true,
///     checksum: false,
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub excludes: Vec<String>,
    pub mirror: Option<bool>,
    pub checksum: Option<bool>,
    pub verbose: Option<bool>,
}

fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

impl Profile {
    pub fn parse(contents: &str) -> Result<Self> {
        let profile = ron_options()
            .from_str(contents)
            .context("Failed to parse config file")?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let profile = ron_options()
            .from_reader(file)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(profile)
    }

    /// `${HOME}/.config/syncdir/config.ron`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".config").join("syncdir").join("config.ron"))
    }

    /// An explicitly named profile must load. Without one, the default
    /// location is used only when the file is there.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("using config profile {}", path.display());
                Self::load(&path).map(Some)
            }
            _ => Ok(None),
        }
    }
}
