// src/github/mod.rs
// =============================================================================
// This module handles everything GitHub-specific:
//
// - locate: parsing repository locators into (owner, name)
// - client: the shared HTTP client and the API/raw endpoint URLs
// - tree:   fetching the recursive file listing and resolving which
//           branch/tag to use
//
// Everything downstream (directory creation, downloads) only sees the
// types re-exported here.
//
// Rust concepts:
// - Modules: Organizing related functionality
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

mod client;
mod locate;
mod tree;

// Re-export the public API so callers write github::parse_repo_url()
// instead of github::locate::parse_repo_url()
pub use client::GithubClient;
pub use locate::{parse_repo_url, RepoLocator};
pub use tree::{fetch_tree, resolve_reference, TreeEntry, TreeKind};
