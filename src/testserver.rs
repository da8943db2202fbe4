// src/testserver.rs
// =============================================================================
// Test-only helper: a tiny HTTP server that serves canned responses.
//
// Our tests need to observe real HTTP behavior (status codes, retries,
// request counts) without touching github.com. This server binds an
// ephemeral localhost port, answers GETs from a fixed route table, and
// counts every request per path so tests can assert "exactly 3 attempts".
//
// A route can be told to fail its first N requests with a 500 before
// succeeding, which is how the retry tests simulate a flaky endpoint.
//
// Compiled only for tests (declared with #[cfg(test)] in main.rs).
// =============================================================================

use crate::github::GithubClient;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One canned route: exact path -> response.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub path: String,
    pub status: u16,
    pub body: Vec<u8>,
    /// Answer the first N requests with a 500 before serving `status`
    pub fail_first: usize,
}

impl Fixture {
    /// A route that always answers 200 with the given body.
    pub fn ok(path: &str, body: Vec<u8>) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body,
            fail_first: 0,
        }
    }

    /// A route that always answers with the given status and an empty body.
    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: Vec::new(),
            fail_first: 0,
        }
    }

    /// A route that fails `fail_first` times with a 500, then serves the
    /// body with a 200.
    pub fn flaky(path: &str, body: Vec<u8>, fail_first: usize) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body,
            fail_first,
        }
    }
}

/// Handle to a running fixture server.
pub struct FixtureServer {
    pub base_url: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FixtureServer {
    /// Binds an ephemeral port and starts answering in the background.
    /// Unknown paths get a 404, like the real endpoints would return.
    pub async fn spawn(fixtures: Vec<Fixture>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let fixtures = Arc::new(fixtures);
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
        let hits_for_server = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let fixtures = fixtures.clone();
                let hits = hits_for_server.clone();
                tokio::spawn(async move {
                    handle_connection(socket, &fixtures, &hits).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    /// A GithubClient whose API and raw endpoints both point at this server.
    pub fn client(&self) -> GithubClient {
        GithubClient::with_bases(&self.base_url, &self.base_url)
    }

    /// How many requests this path has received so far.
    pub fn hits(&self, path: &str) -> usize {
        *self.hits.lock().unwrap().get(path).unwrap_or(&0)
    }
}

// Answers a single connection: read the request head, match the path,
// write one response, close.
async fn handle_connection(
    mut socket: tokio::net::TcpStream,
    fixtures: &[Fixture],
    hits: &Mutex<HashMap<String, usize>>,
) {
    // Read until the end of the request headers; GETs carry no body
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let Ok(n) = socket.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    // Request line looks like: GET /some/path?query HTTP/1.1
    let head = String::from_utf8_lossy(&buf);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(|target| target.split('?').next().unwrap_or(target))
        .unwrap_or("/")
        .to_string();

    // Count the request, remembering which number it is for this path
    let request_number = {
        let mut table = hits.lock().unwrap();
        let counter = table.entry(path.clone()).or_insert(0);
        *counter += 1;
        *counter
    };

    let (status, body): (u16, &[u8]) = match fixtures.iter().find(|f| f.path == path) {
        Some(f) if request_number <= f.fail_first => (500, b"simulated failure"),
        Some(f) => (f.status, &f.body),
        None => (404, b"not found"),
    };

    let response_head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason_phrase(status),
        body.len()
    );

    let _ = socket.write_all(response_head.as_bytes()).await;
    let _ = socket.write_all(body).await;
    let _ = socket.shutdown().await;
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Builds a GitHub tree-listing JSON body from (path, type, size) rows.
pub fn tree_body(entries: &[(&str, &str, Option<u64>)]) -> String {
    let rows: Vec<serde_json::Value> = entries
        .iter()
        .map(|(path, kind, size)| match size {
            Some(s) => serde_json::json!({"path": path, "type": kind, "size": s}),
            None => serde_json::json!({"path": path, "type": kind}),
        })
        .collect();

    serde_json::json!({
        "sha": "0000000000000000000000000000000000000000",
        "tree": rows,
        "truncated": false
    })
    .to_string()
}
