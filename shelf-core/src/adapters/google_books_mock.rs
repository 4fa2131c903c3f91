//! Mock Google Books server for testing
//!
//! Serves `GET /volumes` with the same response shape as the real API:
//! `{ "kind": "books#volumes", "totalItems": N, "items": [...] }`, omitting
//! `items` when there are none.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::Serialize;

/// Mock catalog server
pub struct MockCatalogServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// How the mock should answer
#[derive(Debug, Clone)]
pub struct MockCatalogConfig {
    /// Number of volumes carrying an ISBN
    pub num_volumes: usize,
    /// Extra volumes without any identifier
    pub num_unidentified: usize,
    /// Answer every request with this status and an error body
    pub status: Option<u16>,
    /// Answer with a body that is not JSON
    pub malformed_body: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
    /// Read the request, then close the socket without answering
    pub drop_connection: bool,
}

impl Default for MockCatalogConfig {
    fn default() -> Self {
        Self {
            num_volumes: 3,
            num_unidentified: 0,
            status: None,
            malformed_body: false,
            delay_ms: 0,
            drop_connection: false,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    kind: &'static str,
    total_items: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<MockVolume>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MockVolume {
    id: String,
    volume_info: MockVolumeInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MockVolumeInfo {
    title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<String>,
    published_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    industry_identifiers: Vec<MockIdentifier>,
}

#[derive(Serialize)]
struct MockIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

impl MockCatalogServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockCatalogConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));

        // Non-blocking so the accept loop can notice shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let requests_clone = requests.clone();
        let hits_clone = hits.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        hits_clone.fetch_add(1, Ordering::SeqCst);
                        let cfg = config.clone();
                        let log = requests_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            requests,
            hits,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL to hand to the client
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Request targets (path and query) seen so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of accepted connections
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockCatalogServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockCatalogConfig, log: &Mutex<Vec<String>>) {
    let mut buffer = [0; 4096];
    let Ok(n) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }
    let (method, target) = (parts[0], parts[1]);

    if let Ok(mut seen) = log.lock() {
        seen.push(target.to_string());
    }

    if config.drop_connection {
        return;
    }

    if config.delay_ms > 0 {
        thread::sleep(Duration::from_millis(config.delay_ms));
    }

    if let Some(status) = config.status {
        let body = format!(r#"{{"error": {{"code": {}, "message": "mock failure"}}}}"#, status);
        send_response(&mut stream, status, "Error", &body);
        return;
    }

    if config.malformed_body {
        send_response(&mut stream, 200, "OK", "<html>not json</html>");
        return;
    }

    let path = target.split('?').next().unwrap_or(target);
    match (method, path) {
        ("GET", "/volumes") => {
            let response = generate_volumes(config);
            match serde_json::to_string(&response) {
                Ok(json) => send_response(&mut stream, 200, "OK", &json),
                Err(_) => send_response(&mut stream, 500, "Internal Server Error", "{}"),
            }
        }
        ("GET", _) => send_response(
            &mut stream,
            404,
            "Not Found",
            r#"{"error": "Endpoint not found"}"#,
        ),
        _ => send_response(
            &mut stream,
            405,
            "Method Not Allowed",
            r#"{"error": "Method not allowed"}"#,
        ),
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn generate_volumes(config: &MockCatalogConfig) -> VolumesResponse {
    let authors = [
        vec!["Stephen Hawking".to_string()],
        vec!["Kip Thorne".to_string(), "Roger Blandford".to_string()],
        vec![],
    ];

    let mut items: Vec<MockVolume> = (0..config.num_volumes)
        .map(|i| MockVolume {
            id: format!("vol{}", i + 1),
            volume_info: MockVolumeInfo {
                title: format!("Mock Book {}", i + 1),
                authors: authors[i % authors.len()].clone(),
                published_date: format!("{}-01-15", 1990 + i),
                industry_identifiers: vec![
                    MockIdentifier {
                        kind: "ISBN_10".to_string(),
                        identifier: format!("{:010}", i + 1),
                    },
                    MockIdentifier {
                        kind: "ISBN_13".to_string(),
                        identifier: format!("978{:010}", i + 1),
                    },
                ],
            },
        })
        .collect();

    items.extend((0..config.num_unidentified).map(|i| MockVolume {
        id: format!("noid{}", i + 1),
        volume_info: MockVolumeInfo {
            title: format!("Unidentified {}", i + 1),
            authors: vec![],
            published_date: String::new(),
            industry_identifiers: vec![],
        },
    }));

    VolumesResponse {
        kind: "books#volumes",
        total_items: items.len(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::google_books::{GoogleBooksClient, UNKNOWN_AUTHOR};
    use crate::ports::{BookCatalog, CatalogError};

    fn client_for(server: &MockCatalogServer, timeout: Duration) -> GoogleBooksClient {
        GoogleBooksClient::new(&server.base_url(), Some("test_key"), timeout, 10).unwrap()
    }

    #[test]
    fn test_search_maps_volumes() {
        let server = MockCatalogServer::start(MockCatalogConfig::default()).unwrap();
        let client = client_for(&server, Duration::from_secs(5));

        let books = client.search("physics", "black holes").unwrap();
        assert_eq!(books.len(), 3);

        assert_eq!(books[0].title, "Mock Book 1");
        assert_eq!(books[0].author, "Stephen Hawking");
        assert_eq!(books[0].isbn, "9780000000001");
        assert_eq!(books[0].publication_year, "1990");
        assert_eq!(books[0].category, "physics");
        assert_eq!(books[1].author, "Kip Thorne, Roger Blandford");
        assert_eq!(books[2].author, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_search_sends_query() {
        let server = MockCatalogServer::start(MockCatalogConfig::default()).unwrap();
        let client = client_for(&server, Duration::from_secs(5));
        client.search("physics", "").unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("/volumes?q=subject%3Aphysics"));
        assert!(requests[0].contains("maxResults=10"));
        assert!(requests[0].contains("key=test_key"));
    }

    #[test]
    fn test_zero_items_is_empty_ok() {
        let server = MockCatalogServer::start(MockCatalogConfig {
            num_volumes: 0,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server, Duration::from_secs(5));

        assert_eq!(client.search("physics", "").unwrap(), vec![]);
    }

    #[test]
    fn test_unidentified_volumes_skipped() {
        let server = MockCatalogServer::start(MockCatalogConfig {
            num_volumes: 2,
            num_unidentified: 2,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server, Duration::from_secs(5));

        assert_eq!(client.search("physics", "").unwrap().len(), 2);
    }

    #[test]
    fn test_server_error_is_http_error() {
        for status in [500u16, 429, 403] {
            let server = MockCatalogServer::start(MockCatalogConfig {
                status: Some(status),
                ..Default::default()
            })
            .unwrap();
            let client = client_for(&server, Duration::from_secs(5));

            assert_eq!(
                client.search("physics", ""),
                Err(CatalogError::Http { status })
            );
        }
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let server = MockCatalogServer::start(MockCatalogConfig {
            malformed_body: true,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server, Duration::from_secs(5));

        assert!(matches!(
            client.search("physics", ""),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn test_slow_server_times_out() {
        let server = MockCatalogServer::start(MockCatalogConfig {
            delay_ms: 1500,
            ..Default::default()
        })
        .unwrap();
        let client = client_for(&server, Duration::from_millis(200));

        assert_eq!(client.search("physics", ""), Err(CatalogError::Timeout));
    }

    #[test]
    fn test_unreachable_server() {
        // Bind then drop to get a port nobody listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = GoogleBooksClient::new(
            &format!("http://127.0.0.1:{}", port),
            None,
            Duration::from_secs(2),
            10,
        )
        .unwrap();

        assert_eq!(client.search("physics", ""), Err(CatalogError::Unreachable));
    }

    #[test]
    fn test_request_error_hides_key_and_query() {
        let server = MockCatalogServer::start(MockCatalogConfig {
            drop_connection: true,
            ..Default::default()
        })
        .unwrap();
        let client =
            GoogleBooksClient::new(&server.base_url(), Some("SECRETKEY"), Duration::from_secs(5), 10)
                .unwrap();

        let err = client.search("physics", "my private topic").unwrap_err();
        assert!(matches!(err, CatalogError::Request(_)));

        let shown = crate::Error::Catalog(err.clone()).to_string();
        for text in [err.to_string(), shown, format!("{:?}", err)] {
            assert!(!text.contains("SECRETKEY"), "leaked key: {}", text);
            assert!(!text.contains("private"), "leaked topic: {}", text);
            assert!(!text.contains("volumes?"), "leaked url: {}", text);
        }
    }

    #[test]
    fn test_blank_category_sends_nothing() {
        let server = MockCatalogServer::start(MockCatalogConfig::default()).unwrap();
        let client = client_for(&server, Duration::from_secs(5));

        assert!(client.search("", "anything").is_err());
        thread::sleep(Duration::from_millis(50));
        assert_eq!(server.hits(), 0);
    }
}
