// src/errors.rs
// =============================================================================
// This file defines the error type used by the download pipeline.
//
// Why a custom enum instead of just anyhow?
// - The stages fail in genuinely different ways (bad URL, missing branch,
//   GitHub API trouble, local filesystem trouble)
// - Callers (and our tests!) need to tell those apart with pattern matching
// - anyhow is still used in main.rs where we only display errors
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error for us
// - #[error("...")]: the Display text for each variant
// - #[source]: links an underlying error into the error chain
// =============================================================================

use thiserror::Error;

/// Errors produced by the download pipeline.
///
/// The first four variants are fatal: the run cannot continue without the
/// stage that raised them. `ContentFetch` is per-file and gets folded into
/// a failed download outcome instead of aborting the run.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The input string could not be understood as a GitHub repository.
    /// Pure parsing failure, never retried.
    #[error("invalid repository locator '{input}': {reason}")]
    InvalidLocator { input: String, reason: String },

    /// Every candidate branch/tag was probed and none produced a manifest.
    /// `tried` is the candidate list we walked, `last` the final probe error.
    #[error("no usable branch or tag (tried {tried}); last error: {last}")]
    NoMatchingReference {
        tried: String,
        #[source]
        last: Box<FetchError>,
    },

    /// The recursive tree listing for a reference could not be retrieved
    /// or parsed. Wraps rate-limit, not-found and network causes.
    #[error("could not retrieve the file listing for '{reference}': {reason}")]
    ManifestUnavailable { reference: String, reason: String },

    /// Local directory or file trouble. Fatal for the whole run: a partial
    /// skeleton with no recovery path is useless to the caller.
    #[error("filesystem error at '{path}': {source}")]
    Filesystem {
        // String rather than PathBuf so the error stays cheap to display
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A single file's download failed. Recorded per file, retried by the
    /// worker up to its attempt budget, never fatal for the run.
    #[error("download failed for '{path}': {reason}")]
    ContentFetch { path: String, reason: String },
}

/// Helper to build a `FetchError::Filesystem` with path context.
///
/// Mirrors how we always want filesystem errors reported: the path that
/// was being touched plus the underlying io::Error.
pub fn fs_error<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> FetchError {
    FetchError::Filesystem {
        path: path.as_ref().display().to_string(),
        source,
    }
}
