// src/download/mod.rs
// =============================================================================
// This module turns a manifest into files on disk.
//
// Submodules:
// - dirs: Builds the directory skeleton (runs first, sequentially)
// - pool: Downloads file contents through a bounded worker pool
//
// The split mirrors the two-phase contract: every directory a file needs
// exists before the first worker starts writing.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

mod dirs;
mod pool;

// Re-export the public surface so callers write download::fetch_all()
pub use dirs::{local_destination, materialize_dirs};
pub use pool::{fetch_all, DownloadOutcome, FileStatus};
