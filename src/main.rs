// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Drive the pipeline: parse locator -> resolve reference -> create
//    directories -> download contents
// 3. Print the final report (summary or JSON)
// 4. Exit with proper code (0 = success, 1 = some files failed, 2 = fatal)
//
// The stages run strictly in order: the reference must be confirmed before
// its manifest means anything, and every directory must exist before the
// first file write. Only the last stage is parallel.
//
// Rust concepts:
// - async/await: Because we make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Modules: Each pipeline stage lives in its own file
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod download; // src/download/ - directory skeleton + parallel downloads
mod errors; // src/errors.rs - pipeline error kinds
mod github; // src/github/ - locator parsing, API client, tree listing

// Canned-response HTTP server used by the test suites
#[cfg(test)]
mod testserver;

use crate::download::DownloadOutcome;
use crate::github::{GithubClient, TreeEntry};
use cli::Cli;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// anyhow::Result is used only at this boundary: the modules return typed
// FetchErrors, and here we just need to display whatever bubbled up
use anyhow::Result;

// The #[tokio::main] attribute transforms our async main into a real main
// function that creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit = match run().await {
        Ok(code) => code,
        Err(e) => {
            // A fatal stage error: resolution, manifest or filesystem
            eprintln!("❌ Fatal error: {}", e);
            2
        }
    };

    std::process::exit(exit);
}

// The main application logic
// Returns:
//   Ok(0) = every file retrieved
//   Ok(1) = run finished but some files failed
//   Err   = fatal error before/while setting up (printed as exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let client = GithubClient::new();
    let started = Instant::now();

    let report = run_pipeline(
        &client,
        &cli.repo_url,
        cli.branch.as_deref(),
        cli.output.as_deref(),
        cli.jobs,
    )
    .await?;

    print_report(&report, cli.json, started.elapsed())?;

    Ok(exit_code(&report))
}

/// Everything one download run produces, aggregated for reporting.
/// Serialized as-is when --json was requested.
#[derive(Debug, Serialize)]
struct RunReport {
    /// "owner/name" of the repository
    repository: String,
    /// The confirmed branch/tag everything was fetched from
    reference: String,
    /// Local root the tree was mirrored into
    destination: String,
    /// How many directory entries were materialized
    dirs_created: usize,
    /// Per-file outcomes, in completion order
    files: Vec<DownloadOutcome>,
}

impl RunReport {
    fn ok_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_ok()).count()
    }

    fn failed_files(&self) -> Vec<&DownloadOutcome> {
        self.files.iter().filter(|f| !f.is_ok()).collect()
    }

    fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

// Maps a finished report onto the process exit code
fn exit_code(report: &RunReport) -> i32 {
    if report.failed_files().is_empty() {
        0
    } else {
        1
    }
}

// Drives the four stages in their required order
//
// Parameters:
//   client: HTTP client (tests point it at a fixture server)
//   repo_url: the locator from the command line
//   branch: explicit reference, if the user gave one
//   output: destination directory override
//   jobs: download parallelism
//
// Fatal errors (bad locator, no usable reference, filesystem trouble)
// abort the whole run; per-file failures end up inside the report.
async fn run_pipeline(
    client: &GithubClient,
    repo_url: &str,
    branch: Option<&str>,
    output: Option<&Path>,
    jobs: usize,
) -> std::result::Result<RunReport, errors::FetchError> {
    // Stage 1: pure parsing, no network
    let locator = github::parse_repo_url(repo_url)?;
    println!("\n🔍 Analyzing repository: {}", locator.full_name());

    // Stage 2: confirm a reference; the successful probe IS the manifest
    let (reference, entries) = github::resolve_reference(client, &locator, branch).await?;
    println!("📁 Reference: {}", reference);

    // Default destination: a directory named after the repository
    let destination = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&locator.name),
    };
    println!("💾 Destination: {}", destination.display());

    let files: Vec<TreeEntry> = entries.iter().filter(|e| e.is_file()).cloned().collect();
    let dir_count = entries.iter().filter(|e| e.is_dir()).count();
    println!("📊 Found: {} files in {} directories\n", files.len(), dir_count);

    // Stage 3: full directory skeleton before any content fetch
    let dirs_created = download::materialize_dirs(&entries, &destination)?;

    // Stage 4: bounded parallel downloads
    println!("⬇️  Downloading files...");
    let outcomes = download::fetch_all(client, &locator, &reference, &files, &destination, jobs).await;

    Ok(RunReport {
        repository: locator.full_name(),
        reference,
        destination: destination.display().to_string(),
        dirs_created,
        files: outcomes,
    })
}

// Prints the results either as a human summary or as JSON
fn print_report(report: &RunReport, json: bool, elapsed: Duration) -> Result<()> {
    if json {
        // Serialize the whole report and print
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
        return Ok(());
    }

    let failed = report.failed_files();

    println!("\n{}", "=".repeat(50));
    println!("✅ Download finished in {:.2}s", elapsed.as_secs_f64());
    println!("   📁 Directories created: {}", report.dirs_created);
    println!("   📄 Files downloaded: {}", report.ok_count());
    println!("   💾 Total size: {}", human_size(report.total_bytes()));
    if !failed.is_empty() {
        // Enumerate the failures so the user can retry exactly these
        println!("   ❌ Failed: {}", failed.len());
        for file in &failed {
            println!(
                "      - {} ({})",
                file.path,
                file.message.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!("{}\n", "=".repeat(50));

    Ok(())
}

// Formats a byte count for humans (1536 -> "1.50 KB")
fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}
