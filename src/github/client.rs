// src/github/client.rs
// =============================================================================
// This module owns the HTTP client we use for every request.
//
// Why one shared client?
// - reqwest::Client pools connections internally, so reusing it is much
//   faster than building a new client per request
// - Cloning it is cheap (it's reference-counted inside)
//
// The GitHub endpoints live here as fields rather than constants so that
// tests can point them at a local fixture server.
//
// Rust concepts:
// - #[derive(Clone)]: Each download task gets its own handle to the client
// - HeaderMap: Default headers attached to every request
// - Duration: Bounded timeouts so one dead connection can't stall the pool
// =============================================================================

use crate::github::RepoLocator;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Real GitHub API host, used outside of tests.
const GITHUB_API_BASE: &str = "https://api.github.com";
/// Host that serves raw file bytes for a given reference and path.
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";

// Whole-request timeout. Generous because it covers reading the full body
// of the largest file, not just connecting.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client plus the two endpoint bases every request is built from.
#[derive(Debug, Clone)]
pub struct GithubClient {
    pub(crate) http: Client,
    api_base: String,
    raw_base: String,
}

impl GithubClient {
    /// Client for the real GitHub endpoints.
    pub fn new() -> Self {
        Self::with_bases(GITHUB_API_BASE, GITHUB_RAW_BASE)
    }

    /// Client with custom endpoint bases. Tests use this to aim the whole
    /// pipeline at a local fixture server.
    pub fn with_bases(api_base: &str, raw_base: &str) -> Self {
        let mut headers = HeaderMap::new();
        // GitHub's documented media type for the v3 REST API
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        // Anonymous requests without a User-Agent get rejected outright
        headers.insert(USER_AGENT, HeaderValue::from_static("repo-fetch/0.1.0"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the recursive tree listing for one reference.
    pub fn tree_url(&self, locator: &RepoLocator, reference: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, locator.owner, locator.name, reference
        )
    }

    /// URL of the raw bytes of one file at one reference.
    pub fn raw_url(&self, locator: &RepoLocator, reference: &str, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, locator.owner, locator.name, reference, path
        )
    }
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}
