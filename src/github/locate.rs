// src/github/locate.rs
// =============================================================================
// This module turns whatever the user typed into an (owner, repository) pair.
//
// Accepted shapes:
//   - https://github.com/owner/repo
//   - http://github.com/owner/repo
//   - github.com/owner/repo          (no scheme)
//   - www.github.com/owner/repo
//   - .../owner/repo.git             (suffix stripped)
//   - .../owner/repo/tree/main/...   (extra segments ignored)
//
// Anything that is not a github.com URL with at least two path segments is
// rejected up front - no point making network requests for it.
//
// Rust concepts:
// - The url crate: Proper URL parsing instead of string surgery
// - Result: For error handling
// - Pattern matching on Option/&str
// =============================================================================

use crate::errors::FetchError;
use url::Url;

/// Identifies the remote repository. Immutable once parsed; the confirmed
/// branch/tag is resolved separately and travels alongside this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub name: String,
}

impl RepoLocator {
    /// "owner/name", the way GitHub displays repositories.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

// Parses a repository locator into a RepoLocator
//
// Parameters:
//   input: whatever the user passed on the command line
//
// Returns: RepoLocator on success, FetchError::InvalidLocator otherwise.
// Pure parsing - this function never touches the network.
pub fn parse_repo_url(input: &str) -> Result<RepoLocator, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidLocator {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("empty locator"));
    }

    // Users often paste the URL without a scheme ("github.com/user/repo").
    // Url::parse requires one, so default to https before parsing.
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|_| invalid("not a parseable URL"))?;

    // Only plain web schemes make sense for this tool
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(invalid("only http(s) URLs are supported"));
    }

    // Only GitHub is recognized. A bare "owner/repo" shorthand lands here
    // too, because "owner" parses as the host.
    match url.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => return Err(invalid("not a github.com URL")),
    }

    // Collect the non-empty path segments: /owner/repo[/whatever...]
    let segments: Vec<&str> = url
        .path_segments()
        .map(|parts| parts.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return Err(invalid("expected a path like /owner/repository"));
    }

    let owner = segments[0].to_string();
    // Remove .git suffix if present (people paste clone URLs)
    let name = segments[1].trim_end_matches(".git").to_string();

    if owner.is_empty() || name.is_empty() {
        return Err(invalid("owner and repository name must be non-empty"));
    }

    Ok(RepoLocator { owner, name })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a closure for building the error?
//    - Every rejection needs the same two fields (input + reason)
//    - A tiny closure saves us repeating the struct literal six times
//    - Closures can capture variables from the surrounding scope (input)
//
// 2. What does map_err do?
//    - Transforms the error inside a Result without touching the Ok value
//    - Here it converts url::ParseError into our own FetchError
//    - After map_err, the ? operator would propagate *our* error type
//
// 3. What is host_str()?
//    - Returns Option<&str> with the host part of the URL
//    - Some("github.com") for https://github.com/foo
//    - None for URLs without a host
//
// 4. Why check the scheme at all?
//    - Url::parse happily accepts ftp:// or file:// URLs
//    - We would fail later with a confusing network error; better to
//      reject clearly during parsing
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let locator = parse_repo_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(locator.owner, "rust-lang");
        assert_eq!(locator.name, "rust");
        assert_eq!(locator.full_name(), "rust-lang/rust");
    }

    #[test]
    fn test_parse_url_without_scheme() {
        let locator = parse_repo_url("github.com/user/repo").unwrap();
        assert_eq!(locator.owner, "user");
        assert_eq!(locator.name, "repo");
    }

    #[test]
    fn test_parse_www_prefix() {
        let locator = parse_repo_url("https://www.github.com/user/repo").unwrap();
        assert_eq!(locator.owner, "user");
    }

    #[test]
    fn test_parse_strips_git_suffix() {
        let locator = parse_repo_url("https://github.com/user/repo.git").unwrap();
        assert_eq!(locator.name, "repo");
    }

    #[test]
    fn test_parse_ignores_extra_segments() {
        // People paste deep links; everything past owner/repo is irrelevant
        let locator = parse_repo_url("https://github.com/user/repo/tree/main/src").unwrap();
        assert_eq!(locator.owner, "user");
        assert_eq!(locator.name, "repo");
    }

    #[test]
    fn test_parse_trailing_slash() {
        let locator = parse_repo_url("https://github.com/user/repo/").unwrap();
        assert_eq!(locator.name, "repo");
    }

    #[test]
    fn test_reject_other_hosts() {
        let result = parse_repo_url("https://gitlab.com/user/repo");
        assert!(matches!(result, Err(FetchError::InvalidLocator { .. })));
    }

    #[test]
    fn test_reject_single_segment() {
        let result = parse_repo_url("https://github.com/user");
        assert!(matches!(result, Err(FetchError::InvalidLocator { .. })));
    }

    #[test]
    fn test_reject_bare_shorthand() {
        // "owner/repo" parses with "owner" as the host, which isn't GitHub
        let result = parse_repo_url("user/repo");
        assert!(matches!(result, Err(FetchError::InvalidLocator { .. })));
    }

    #[test]
    fn test_reject_non_http_scheme() {
        let result = parse_repo_url("ftp://github.com/user/repo");
        assert!(matches!(result, Err(FetchError::InvalidLocator { .. })));
    }

    #[test]
    fn test_reject_empty_input() {
        let result = parse_repo_url("   ");
        assert!(matches!(result, Err(FetchError::InvalidLocator { .. })));
    }
}
