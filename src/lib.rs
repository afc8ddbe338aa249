//! Make a destination directory reflect a source directory, copying only what
//! changed and, in mirror mode, deleting what the source no longer has.

/// Provides the command-line definition.
pub mod args;
/// Provides the command-line shell that wires arguments to the engine.
pub mod cli;
/// Provides the file comparator that decides whether a copy is needed.
pub mod compare;
/// Provides support to represent run options and the on-disk RON profile.
pub mod config;
/// Provides the filesystem side effects: copy, create directory, delete.
pub mod copy;
/// Provides the two-pass synchronization engine.
pub mod engine;
/// Provides the error type shared by every stage and its exit codes.
pub mod error;
/// Provides streaming content hashing.
pub mod hasher;
/// Provides the tracing subscriber setup.
pub mod logging;
/// Provides the exclude pattern matcher.
pub mod pattern;
/// Provides the reporting surface the engine narrates through.
pub mod report;
/// Provides the pre-flight path checks.
pub mod safety;
/// Provides the per-entry data model.
pub mod tree;

pub use config::SyncConfig;
pub use engine::{sync_dir, sync_file};
pub use error::{Result, SyncError};
pub use report::{ConsoleReporter, RecordingReporter, Reporter, SyncSummary};
pub use tree::{MirrorDecision, SyncDecision, TreeEntry};
