// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The tool does exactly one thing (download a repository), so there are
// no subcommands - just a positional URL and a few optional flags.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - Option<T>: For flags the user may leave out
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "repo-fetch",
    version = "0.1.0",
    about = "Download a public GitHub repository over plain HTTPS, no git required",
    long_about = "repo-fetch mirrors the file tree of a public GitHub repository onto local disk \
                  using only generic HTTPS requests. Handy on networks where the git clone \
                  protocol is blocked but regular web traffic is allowed."
)]
pub struct Cli {
    /// GitHub repository URL (e.g., https://github.com/rust-lang/rust)
    ///
    /// This is a positional argument (required, no flag needed).
    /// Scheme-less forms like github.com/user/repo work too.
    pub repo_url: String,

    /// Branch or tag to download
    ///
    /// When omitted we try 'main' first and fall back to 'master',
    /// since older repositories still use the legacy default name.
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Output directory (default: a directory named after the repository)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How many files to download in parallel
    ///
    /// Higher is faster but more likely to trip GitHub's rate limiting.
    #[arg(short, long, default_value_t = 5)]
    pub jobs: usize,

    /// Output the final report in JSON format instead of a summary
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}
