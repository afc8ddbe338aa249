//! Filesystem side effects: copying one file, creating and deleting entries.
//! Each function is a no-op under `dry_run`.

use crate::error::{IoResultExt, Result};
use filetime::FileTime;
use std::{
    fs,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

/// Buffer size for both ends of a copy.
const COPY_BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` to `dst` byte for byte and give `dst` the modification time of
/// `src`.
///
/// The parent directory of `dst` is created if needed. A new `dst` gets the
/// permission bits of `src`; an existing one is truncated in place. On error
/// `dst` may be left partially written.
pub fn copy_file(src: &Path, dst: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).at("create directory", parent)?;
    }

    let src_file = fs::File::open(src).at("open", src)?;
    let src_meta = src_file.metadata().at("inspect", src)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(src_meta.permissions().mode());
    }
    let dst_file = options.open(dst).at("create", dst)?;

    let mut reader = BufReader::with_capacity(COPY_BUF_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUF_SIZE, dst_file);
    io::copy(&mut reader, &mut writer).at("copy", src)?;
    writer.flush().at("write", dst)?;
    let dst_file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)
        .at("write", dst)?;
    drop(dst_file);
    drop(reader);

    let mtime = FileTime::from_last_modification_time(&src_meta);
    filetime::set_file_mtime(dst, mtime).at("set modification time of", dst)?;
    Ok(())
}

/// Make sure `dir` exists as a directory. Returns whether it had to be created
/// (or would be, under `dry_run`).
pub fn ensure_dir(dir: &Path, dry_run: bool) -> Result<bool> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "a non-directory entry is in the way",
        ))
        .at("create directory", dir),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if !dry_run {
                fs::create_dir_all(dir).at("create directory", dir)?;
            }
            Ok(true)
        }
        Err(e) => Err(e).at("inspect", dir),
    }
}

/// Delete a file, or a directory with everything in it.
pub fn remove_path(path: &Path, is_dir: bool, dry_run: bool) -> Result<()> {
    if dry_run {
        return Ok(());
    }
    if is_dir {
        fs::remove_dir_all(path).at("remove directory", path)
    } else {
        fs::remove_file(path).at("remove", path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn pin_mtime(path: &Path, secs: i64) {
        filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
    }

    #[test]
    fn test_copy_file_preserves_content_and_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("nested").join("deeper").join("dst.txt");
        fs::write(&src, b"abc").unwrap();
        pin_mtime(&src, 1_600_000_000);

        copy_file(&src, &dst, false).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"abc");
        let modified = fs::metadata(&dst).unwrap().modified().unwrap();
        assert_eq!(
            modified,
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
        );
    }

    #[test]
    fn test_copy_file_truncates_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, b"short").unwrap();
        fs::write(&dst, b"a much longer previous content").unwrap();

        copy_file(&src, &dst, false).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"short");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_carries_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("run.sh");
        let dst = dir.path().join("out").join("run.sh");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();

        copy_file(&src, &dst, false).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        // the process umask may clear bits but never adds any
        assert_eq!(mode & !0o750, 0);
        assert_ne!(mode & 0o100, 0);
    }

    #[test]
    fn test_copy_file_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("sub").join("dst.txt");
        fs::write(&src, b"abc").unwrap();

        copy_file(&src, &dst, true).unwrap();
        assert!(!dst.exists());
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_copy_missing_source_is_runtime_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("nope"), &dir.path().join("dst"), false).unwrap_err();
        assert!(!err.is_usage());
    }

    #[test]
    fn test_ensure_dir() {
        let parent = tempfile::tempdir().unwrap();
        let target = parent.path().join("newdir");

        assert!(ensure_dir(&target, true).unwrap());
        assert!(!target.exists(), "dry run must not create");

        assert!(ensure_dir(&target, false).unwrap());
        assert!(target.is_dir());
        assert!(!ensure_dir(&target, false).unwrap());

        let file = parent.path().join("file");
        fs::write(&file, b"x").unwrap();
        assert!(ensure_dir(&file, false).is_err());
    }

    #[test]
    fn test_remove_path_file_and_dir() {
        let base = tempfile::tempdir().unwrap();

        let f = base.path().join("x.txt");
        fs::write(&f, b"x").unwrap();
        remove_path(&f, false, true).unwrap();
        assert!(f.exists());
        remove_path(&f, false, false).unwrap();
        assert!(!f.exists());

        let d = base.path().join("d");
        fs::create_dir_all(d.join("inner")).unwrap();
        fs::write(d.join("inner").join("y.txt"), b"y").unwrap();
        remove_path(&d, true, false).unwrap();
        assert!(!d.exists());
    }
}
