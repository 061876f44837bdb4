//! Shared test utilities for the folio test suite.
//!
//! Fixture content, ready-made stores and pages, click-path builders for the
//! rendered cards, and a one-shot loopback HTTP server for the network code.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = sample_store();
//! assert!(store.project("p1").is_some());
//!
//! let server = OneShotServer::respond("HTTP/1.1 200 OK", SAMPLE_CONTENT);
//! let document = content::load(&server.url(), &FetchConfig::default(), "en").unwrap();
//! assert!(server.request().starts_with("GET "));
//! ```

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::content::{self, ContentDocument, Store};
use crate::page::{Page, Skeleton};
use crate::router::Element;
use crate::types::LinkKind;

// =========================================================================
// Fixture content
// =========================================================================

/// The bilingual fixture document (`fixtures/content.json`).
pub const SAMPLE_CONTENT: &str = include_str!("../fixtures/content.json");

pub fn sample_document() -> ContentDocument {
    content::parse(SAMPLE_CONTENT, "en").unwrap()
}

/// Store over the fixture document with `en` active.
pub fn sample_store() -> Store {
    Store::new(sample_document(), "en").unwrap()
}

/// The full portfolio skeleton painted in `locale`.
pub fn painted_page(locale: &str) -> Page {
    let store = Store::new(sample_document(), locale).unwrap();
    let mut page = Page::new(Skeleton::portfolio());
    page.paint(&store);
    page
}

// =========================================================================
// Click paths
// =========================================================================

pub fn project_card(id: &str) -> Element {
    Element::card(LinkKind::ProjectDetails, id)
}

pub fn publication_card(id: &str) -> Element {
    Element::card(LinkKind::PublicationDetails, id)
}

// =========================================================================
// Loopback HTTP
// =========================================================================

/// Serves exactly one HTTP response on 127.0.0.1 and records the request.
pub struct OneShotServer {
    addr: String,
    request: mpsc::Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl OneShotServer {
    /// Answer the first connection with `status_line` (e.g.
    /// `"HTTP/1.1 404 Not Found"`) and `body`.
    pub fn respond(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let request = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = tx.send(request);
        });

        Self {
            addr,
            request: rx,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/content.json", self.addr)
    }

    /// Raw text of the request the server received.
    pub fn request(&self) -> String {
        self.request
            .recv_timeout(Duration::from_secs(5))
            .expect("server received no request")
    }
}

impl Drop for OneShotServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

/// Read headers plus a `Content-Length` body.
fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}
