// src/github/tree.rs
// =============================================================================
// This module fetches the recursive file listing ("tree") of a repository
// and figures out which branch/tag to use.
//
// Strategy:
// - One GET against the git/trees API with ?recursive=1 returns every path
//   in the repository in a single response - no directory walking needed
// - Resolving a reference and fetching its manifest are the same request:
//   we probe candidates in order and keep the manifest of the first one
//   that answers, so the reference is confirmed exactly once
//
// Branch fallback:
// - With an explicit --branch we try only that name (failing loudly beats
//   silently downloading the wrong branch)
// - Without one we try 'main' then 'master', because default-branch naming
//   is inconsistent across old and new repositories
//
// Rust concepts:
// - serde Deserialize: Maps the JSON response onto plain structs
// - Enums with serde renames: "blob"/"tree" strings become typed variants
// - Slices and iterators: Walking the candidate list
// =============================================================================

use crate::errors::FetchError;
use crate::github::{GithubClient, RepoLocator};
use serde::Deserialize;

/// What a manifest row points at.
///
/// "blob" is a file, "tree" a directory, "commit" a submodule pointer.
/// Submodules can't be downloaded through the raw endpoint, so the rest of
/// the pipeline skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Blob,
    Tree,
    Commit,
}

/// One row of the recursive listing: a slash-separated relative path plus
/// what kind of object lives there. Read-only after parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeKind,
    /// Present for blobs only; feeds the size total in the summary.
    #[serde(default)]
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn is_file(&self) -> bool {
        self.kind == TreeKind::Blob
    }

    pub fn is_dir(&self) -> bool {
        self.kind == TreeKind::Tree
    }
}

// The response envelope around the entries.
//
// `truncated` is set when the repository is too large for one response;
// GitHub then returns only a prefix of the tree.
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

// Fetches the recursive tree listing for one reference
//
// Parameters:
//   client: shared HTTP client
//   locator: which repository
//   reference: branch or tag name to list
//
// Returns: the entries, or ManifestUnavailable wrapping whatever went
// wrong (rate limit, unknown reference, network trouble, bad JSON).
pub async fn fetch_tree(
    client: &GithubClient,
    locator: &RepoLocator,
    reference: &str,
) -> Result<Vec<TreeEntry>, FetchError> {
    let unavailable = |reason: String| FetchError::ManifestUnavailable {
        reference: reference.to_string(),
        reason,
    };

    let url = client.tree_url(locator, reference);

    let response = client.http.get(&url).send().await.map_err(|e| {
        if e.is_timeout() {
            unavailable("request timed out".to_string())
        } else {
            unavailable(e.to_string())
        }
    })?;

    let status = response.status();
    if status == reqwest::StatusCode::FORBIDDEN {
        // Unauthenticated API access is capped per hour; tell the user
        // when the window reopens if GitHub said so
        let reset = response
            .headers()
            .get("X-RateLimit-Reset")
            .and_then(|v| v.to_str().ok())
            .map(|v| format!(" (rate limit resets at unix time {})", v))
            .unwrap_or_default();
        return Err(unavailable(format!("rate limit exceeded (HTTP 403){}", reset)));
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(unavailable("not found (HTTP 404)".to_string()));
    }
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {}", status.as_u16())));
    }

    let listing: TreeResponse = response
        .json()
        .await
        .map_err(|e| unavailable(format!("unparseable response: {}", e)))?;

    if listing.truncated {
        // The API capped the listing; we can only mirror what it returned
        eprintln!(
            "⚠️  GitHub truncated the file listing for '{}'; the download will be incomplete",
            reference
        );
    }

    Ok(listing.tree)
}

// Builds the ordered list of references to probe
//
// Explicit wish -> just that. Nothing specified -> 'main' then 'master'.
fn candidates(requested: Option<&str>) -> Vec<String> {
    match requested {
        Some(name) => vec![name.to_string()],
        None => vec!["main".to_string(), "master".to_string()],
    }
}

// Resolves a working reference by probing candidates in order
//
// Parameters:
//   client: shared HTTP client
//   locator: which repository
//   requested: the user's --branch value, if any
//
// Returns: (confirmed reference, its manifest). The manifest comes from
// the successful probe itself, so callers never fetch it a second time.
//
// Fails with NoMatchingReference carrying the last probe error once every
// candidate has been tried.
pub async fn resolve_reference(
    client: &GithubClient,
    locator: &RepoLocator,
    requested: Option<&str>,
) -> Result<(String, Vec<TreeEntry>), FetchError> {
    let names = candidates(requested);
    let mut last_error: Option<FetchError> = None;

    for (index, name) in names.iter().enumerate() {
        match fetch_tree(client, locator, name).await {
            Ok(entries) => return Ok((name.clone(), entries)),
            Err(e) => {
                // Announce the fallback so a 'master'-only repository
                // doesn't look like it silently ignored the probe failure
                if let Some(next) = names.get(index + 1) {
                    eprintln!("⚠️  Reference '{}' unavailable, trying '{}'...", name, next);
                }
                last_error = Some(e);
            }
        }
    }

    // last_error is always Some here: candidates() never returns an empty
    // list, so the loop body ran at least once
    let last = last_error.unwrap_or_else(|| FetchError::ManifestUnavailable {
        reference: String::new(),
        reason: "no candidates to try".to_string(),
    });

    Err(FetchError::NoMatchingReference {
        tried: names
            .iter()
            .map(|n| format!("'{}'", n))
            .collect::<Vec<_>>()
            .join(", "),
        last: Box::new(last),
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does the probe return the manifest too?
//    - "Does this branch exist?" and "list this branch" are the same API
//      call, so throwing the successful response away would mean paying
//      for it twice - and the second answer could even differ if the
//      branch moved in between
//
// 2. What is #[serde(rename = "type")]?
//    - The JSON field is called "type", but that's a reserved word in Rust
//    - rename lets the struct field have a different name than the JSON key
//
// 3. What is #[serde(default)]?
//    - If the JSON key is missing, use the type's default value
//    - Directory rows have no "size" key, so size becomes None
//
// 4. Why Box<FetchError> inside NoMatchingReference?
//    - An enum must have a known size; nesting the enum in itself directly
//      would make the size infinite
//    - Box stores the inner error on the heap, so the variant stays small
// -----------------------------------------------------------------------------
