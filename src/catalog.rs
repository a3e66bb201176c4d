//! Candidate sources.
//!
//! The catalog is fetched exactly once, when shelf starts. The fetch runs as a
//! background task whose only output is an [`Event::CandidatesLoaded`] sent into
//! the event loop, so the controller is never touched outside of it. A failed
//! fetch is logged and delivers an empty set.

use std::fmt::Display;
use std::path::PathBuf;

use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::Candidate;
use crate::tui::Event;

/// The endpoint queried when no source is configured
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Errors that can occur while fetching the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The HTTP request failed or returned an error status
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The catalog file could not be read
    #[error("could not read {path}: {source}")]
    Io {
        /// Path of the catalog file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// The body is not a JSON array
    #[error("invalid catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can produce the candidate set
pub trait CandidateSource: Display + Send + Sync {
    /// Fetches the full candidate set
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Candidate>, CatalogError>>;
}

/// Fetches the catalog with an HTTP GET
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source for the given endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a source for the given endpoint using a preconfigured client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self { url: url.into(), client }
    }
}

impl Display for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

impl CandidateSource for HttpSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Candidate>, CatalogError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            debug!("fetching catalog from {url}");
            let response = client.get(&url).send().await?.error_for_status()?;
            let body = response.bytes().await?;
            decode_candidates(&body)
        })
    }
}

/// Reads the catalog from a JSON file with the same shape as the HTTP endpoint
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Display for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl CandidateSource for FileSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Candidate>, CatalogError>> {
        let path = self.path.clone();
        Box::pin(async move {
            let body = tokio::fs::read(&path)
                .await
                .map_err(|source| CatalogError::Io { path, source })?;
            decode_candidates(&body)
        })
    }
}

/// An in-memory candidate set
#[derive(Clone, Default)]
pub struct StaticSource {
    candidates: Vec<Candidate>,
}

impl StaticSource {
    /// Creates a source that always yields `candidates`
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl Display for StaticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} static candidates>", self.candidates.len())
    }
}

impl CandidateSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Candidate>, CatalogError>> {
        let candidates = self.candidates.clone();
        Box::pin(async move { Ok(candidates) })
    }
}

#[derive(Deserialize)]
struct Product {
    id: u64,
    title: String,
    image: String,
}

impl From<Product> for Candidate {
    fn from(product: Product) -> Self {
        Candidate::new(product.id, product.title, product.image)
    }
}

/// Decodes a catalog body.
///
/// The body must be a JSON array. Entries missing `id`, `title` or `image`, or
/// carrying them with the wrong type, are skipped.
pub fn decode_candidates(body: &[u8]) -> Result<Vec<Candidate>, CatalogError> {
    let entries: Vec<Value> = serde_json::from_slice(body)?;
    let total = entries.len();
    let candidates: Vec<Candidate> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<Product>(entry) {
            Ok(product) => Some(product.into()),
            Err(e) => {
                debug!("skipping catalog entry {idx}: {e}");
                None
            }
        })
        .collect();
    if candidates.len() != total {
        warn!("skipped {} malformed catalog entries", total - candidates.len());
    }
    Ok(candidates)
}

/// Spawns the one-shot fetch.
///
/// The result is always delivered as [`Event::CandidatesLoaded`]; on failure the
/// set is empty.
pub fn spawn_fetch(source: Box<dyn CandidateSource>, tx: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let candidates = match source.fetch().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("failed to fetch catalog from {source}: {e}");
                Vec::new()
            }
        };
        if tx.send(Event::CandidatesLoaded(candidates)).is_err() {
            debug!("event loop is gone, dropping catalog");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_products() {
        let body = br#"[
            {"id": 1, "title": "Red Shirt", "price": 10.5, "image": "https://img/1.png"},
            {"id": 2, "title": "Blue Shirt", "image": "https://img/2.png"}
        ]"#;
        let res = decode_candidates(body).unwrap();
        assert_eq!(
            res,
            vec![
                Candidate::new(1, "Red Shirt", "https://img/1.png"),
                Candidate::new(2, "Blue Shirt", "https://img/2.png"),
            ]
        );
    }

    #[test]
    fn skips_malformed_entries() {
        let body = br#"[
            {"id": 1, "title": "Red Shirt", "image": "a"},
            {"id": 2, "image": "b"},
            {"id": "3", "title": "Red Hat", "image": "c"},
            {"title": "Blue Hat", "image": "d"},
            {"id": 5, "title": null, "image": "e"},
            42,
            {"id": 6, "title": "Green Hat", "image": "f"}
        ]"#;
        let ids: Vec<u64> = decode_candidates(body).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            decode_candidates(br#"{"id": 1}"#),
            Err(CatalogError::Decode(_))
        ));
        assert!(matches!(decode_candidates(b"not json"), Err(CatalogError::Decode(_))));
    }

    #[test]
    fn empty_array() {
        assert!(decode_candidates(b"[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn static_source_yields_candidates() {
        let source = StaticSource::new(vec![Candidate::new(1, "Red Shirt", "")]);
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }

    /// Serves one canned HTTP response on a local port
    fn serve_once(status: &str, body: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/products")
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn http_source_decodes_body() {
        let url = serve_once(
            "200 OK",
            r#"[{"id": 1, "title": "Red Shirt", "image": "a"}, {"id": 2, "title": "Blue Shirt"}]"#,
        );
        let source = HttpSource::with_client(url, local_client());
        let candidates = source.fetch().await.unwrap();
        assert_eq!(candidates, vec![Candidate::new(1, "Red Shirt", "a")]);
    }

    #[tokio::test]
    async fn http_source_rejects_error_status() {
        let url = serve_once("500 Internal Server Error", "[]");
        let source = HttpSource::with_client(url, local_client());
        assert!(matches!(source.fetch().await, Err(CatalogError::Http(_))));
    }

    #[tokio::test]
    async fn failed_fetch_delivers_empty_set() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let source = FileSource::new("/this/path/does/not/exist.json");
        spawn_fetch(Box::new(source), tx).await.unwrap();
        match rx.recv().await {
            Some(Event::CandidatesLoaded(candidates)) => assert!(candidates.is_empty()),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
