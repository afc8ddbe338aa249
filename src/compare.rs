use crate::{
    error::{IoResultExt, Result},
    hasher::get_file_hash,
    tree::TreeEntry,
};
use sha1::Sha1;
use std::time::{Duration, SystemTime};

/// Largest modification-time difference still treated as "same time".
/// Covers filesystems that store timestamps at coarse granularity.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(1);

/// Absolute distance between two timestamps.
pub fn time_distance(a: SystemTime, b: SystemTime) -> Duration {
    match a.duration_since(b) {
        Ok(d) => d,
        Err(e) => e.duration(),
    }
}

/// Cheap signal: same size and modification times within [`MTIME_TOLERANCE`].
pub fn size_and_time_match(source: &TreeEntry, dest: &TreeEntry) -> bool {
    source.size == dest.size && time_distance(source.modified, dest.modified) <= MTIME_TOLERANCE
}

/// Decide whether `dest` already holds what `source` would copy.
///
/// Without checksum mode the size/time signal decides alone. With it, both
/// files are hashed and the digests decide, whatever size and time say.
pub fn are_equivalent(source: &TreeEntry, dest: &TreeEntry, use_checksum: bool) -> Result<bool> {
    if !use_checksum {
        return Ok(size_and_time_match(source, dest));
    }
    let mut hasher = Sha1::default();
    let source_hash =
        get_file_hash(&source.path.absolute, &mut hasher).at("hash", &source.path.absolute)?;
    let dest_hash =
        get_file_hash(&dest.path.absolute, &mut hasher).at("hash", &dest.path.absolute)?;
    Ok(source_hash == dest_hash)
}
