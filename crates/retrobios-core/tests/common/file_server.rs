//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of path -> body mappings; any other path gets 404.
//! Counts every request so tests can assert that skip-cached re-runs stay
//! off the network.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct FileServerOptions {
    /// If false, responses omit `Content-Length` (progress totals degrade
    /// to the unknown-total case).
    pub send_content_length: bool,
}

impl Default for FileServerOptions {
    fn default() -> Self {
        Self {
            send_content_length: true,
        }
    }
}

/// Handle to a running stub server.
pub struct FileServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl FileServer {
    /// Base URL ending in "/", e.g. "http://127.0.0.1:12345/".
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests handled so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `files` (keys are
/// absolute request paths like "/a.bin"). Runs until the process exits.
pub fn start(files: HashMap<String, Vec<u8>>) -> FileServer {
    start_with_options(files, FileServerOptions::default())
}

pub fn start_with_options(files: HashMap<String, Vec<u8>>, opts: FileServerOptions) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files = Arc::new(files);
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let hits = Arc::clone(&hits_srv);
            thread::spawn(move || handle(stream, &files, &hits, opts));
        }
    });
    FileServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    files: &HashMap<String, Vec<u8>>,
    hits: &AtomicUsize,
    opts: FileServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match parse_request_path(request) {
        Some(p) => p,
        None => return,
    };
    hits.fetch_add(1, Ordering::SeqCst);

    match files.get(&path) {
        Some(body) => {
            let content_length = if opts.send_content_length {
                format!("Content-Length: {}\r\n", body.len())
            } else {
                String::new()
            };
            let response = format!(
                "HTTP/1.1 200 OK\r\n{}Connection: close\r\n\r\n",
                content_length
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let body = b"not found";
            let response = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
    }
}

/// Returns the request path of a GET, without any query string.
fn parse_request_path(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    let target = parts.next()?;
    let path = target.split('?').next().unwrap_or(target);
    Some(path.to_string())
}
