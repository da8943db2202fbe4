// src/download/pool.rs
// =============================================================================
// This module downloads the actual file contents, many at a time.
//
// Key functionality:
// - A bounded worker pool (buffer_unordered) so we never have more than
//   --jobs requests in flight
// - Each file streams its response body to disk chunk by chunk, so a big
//   file never has to fit in memory
// - Transient failures are retried up to a small fixed budget; a file that
//   keeps failing is recorded and the rest of the run continues
//
// Files are independent and unordered - no task ever waits on another,
// and results are accepted in whatever order they finish.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Streams: buffer_unordered for the pool, bytes_stream for the body
// - Enums: To represent the per-file outcome
// =============================================================================

use crate::download::dirs::local_destination;
use crate::errors::FetchError;
use crate::github::{GithubClient, RepoLocator, TreeEntry};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

// Total tries per file, including the first one.
const MAX_ATTEMPTS: u32 = 3;
// Small pause before retrying, so a hiccuping server gets a moment to
// recover instead of three requests back to back.
const RETRY_DELAY: Duration = Duration::from_millis(250);

// How the download of one file ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// File written to disk in full
    Done,
    /// All attempts exhausted; the file is missing or incomplete locally
    Failed,
}

/// The result of downloading a single file.
///
/// This is what the orchestrator aggregates into the final report.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadOutcome {
    /// Manifest path of the file (slash-separated, as GitHub reports it)
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Bytes written to disk (0 for failures)
    pub bytes: u64,
    /// How many tries this file consumed
    pub attempts: u32,
    /// Failure reason, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DownloadOutcome {
    fn done(path: &str, bytes: u64, attempts: u32) -> Self {
        Self {
            path: path.to_string(),
            status: FileStatus::Done,
            bytes,
            attempts,
            message: None,
        }
    }

    fn failed(path: &str, attempts: u32, message: String) -> Self {
        Self {
            path: path.to_string(),
            status: FileStatus::Failed,
            bytes: 0,
            attempts,
            message: Some(message),
        }
    }

    /// Helper to check whether the file made it onto disk.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, FileStatus::Done)
    }
}

// Downloads every file in the manifest, bounded by `jobs` parallel workers
//
// This is the main entry point for content fetching. The directory
// skeleton must already exist (see dirs::materialize_dirs) - workers
// write into their parent directories without checking them.
//
// Why buffer_unordered?
// - It runs up to `jobs` futures at once and yields results as they
//   complete, which is exactly the "flat pool over a shared queue"
//   this stage needs - no ordering between files required
pub async fn fetch_all(
    client: &GithubClient,
    locator: &RepoLocator,
    reference: &str,
    files: &[TreeEntry],
    root: &Path,
    jobs: usize,
) -> Vec<DownloadOutcome> {
    let total = files.len();

    let tasks = files.iter().map(|entry| {
        // Each task owns its own client handle (cheap: reference-counted)
        let client = client.clone();
        let url = client.raw_url(locator, reference, &entry.path);
        let path = entry.path.clone();
        let destination = local_destination(root, &entry.path);

        async move {
            match destination {
                Some(dest) => download_file(&client, &url, &path, &dest).await,
                // Same refusal as the materializer: never write outside root
                None => DownloadOutcome::failed(&path, 0, "unsafe path refused".to_string()),
            }
        }
    });

    let mut in_flight = stream::iter(tasks).buffer_unordered(jobs.max(1));

    // Results arrive in completion order; this loop is the single place
    // they are collected, so no shared mutable state is needed
    let mut results = Vec::with_capacity(total);
    while let Some(outcome) = in_flight.next().await {
        let finished = results.len() + 1;
        if outcome.is_ok() {
            println!("   [{}/{}] ✅ {}", finished, total, outcome.path);
        } else {
            println!(
                "   [{}/{}] ❌ {} ({})",
                finished,
                total,
                outcome.path,
                outcome.message.as_deref().unwrap_or("unknown error")
            );
        }
        results.push(outcome);
    }

    results
}

// Downloads one file, retrying transient failures
//
// The retry loop lives entirely inside the task: one worker drives one
// file at a time, so the same file is never attempted concurrently.
async fn download_file(
    client: &GithubClient,
    url: &str,
    path: &str,
    destination: &Path,
) -> DownloadOutcome {
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match try_fetch(client, url, path, destination).await {
            Ok(bytes) => return DownloadOutcome::done(path, bytes, attempt),
            Err(e) => {
                last_error = e.to_string();
                if attempt < MAX_ATTEMPTS {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    DownloadOutcome::failed(path, MAX_ATTEMPTS, last_error)
}

// One fetch attempt: GET the raw URL and stream the body to disk
//
// File::create truncates an existing file, so a retry after a partial
// write starts clean, and re-running the whole tool overwrites in place.
async fn try_fetch(
    client: &GithubClient,
    url: &str,
    path: &str,
    destination: &Path,
) -> Result<u64, FetchError> {
    let content_error = |reason: String| FetchError::ContentFetch {
        path: path.to_string(),
        reason,
    };

    let response = client.http.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            content_error("request timed out".to_string())
        } else {
            content_error(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(content_error(format!("HTTP {}", status.as_u16())));
    }

    let mut file = File::create(destination)
        .await
        .map_err(|e| content_error(format!("cannot create file: {}", e)))?;

    // Stream chunk by chunk; large-file-storage pointer files come through
    // here like any other file, as the small text they are
    let mut body = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| content_error(format!("body read failed: {}", e)))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| content_error(format!("write failed: {}", e)))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| content_error(format!("flush failed: {}", e)))?;

    Ok(written)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is buffer_unordered?
//    - It takes a stream of futures and polls up to N of them at once
//    - Results come out as they finish, not in input order
//    - It's like Promise.all() with a concurrency limit, except you get
//      each result as soon as it's ready
//
// 2. Why stream the body instead of response.bytes()?
//    - .bytes() buffers the whole file in memory first
//    - .bytes_stream() hands us chunks as they arrive, which we append to
//      the file - memory use stays flat no matter the file size
//
// 3. Why does the retry loop not need a lock?
//    - A task owns its file from first attempt to final outcome
//    - Retries are sequential within the task, so "no concurrent retries
//      of the same file" holds by construction
//
// 4. Why record failures instead of returning Err?
//    - One stubborn file shouldn't cancel hundreds of healthy downloads
//    - The orchestrator reports the failed paths at the end so the user
//      can retry just those
// -----------------------------------------------------------------------------
