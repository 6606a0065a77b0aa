#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading of the map documents.
//!
//! Each document is read from an HTTP(S) URL or a local file, parsed as
//! `TopoJSON` or `GeoJSON`, and cached for the lifetime of a
//! [`SessionData`]. Failures are fatal: there is no retry and no
//! fallback.

pub mod progress;
pub mod session;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use jobs_map_topology::{Document, TopologyError};
use thiserror::Error;

pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use session::SessionData;

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The local file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid UTF-8.
    #[error("Document at {location} is not valid UTF-8: {source}")]
    Utf8 {
        /// Where the document came from.
        location: String,
        /// Decoding failure.
        source: std::string::FromUtf8Error,
    },

    /// The document could not be decoded.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote document.
    Url(String),
    /// Local file.
    File(PathBuf),
}

impl Source {
    /// Interprets `location` as a URL when it has an `http(s)://` scheme,
    /// as a file path otherwise.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn decode_text(source: &Source, body: Vec<u8>) -> Result<String, FetchError> {
    String::from_utf8(body).map_err(|e| FetchError::Utf8 {
        location: source.to_string(),
        source: e,
    })
}

/// Reads the raw text of `source`.
///
/// # Errors
///
/// Returns [`FetchError`] if the request fails, the server returns a
/// non-success status, the file cannot be read, or the body is not
/// valid UTF-8.
pub async fn fetch_text(
    client: &reqwest::Client,
    source: &Source,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<String, FetchError> {
    match source {
        Source::Url(url) => {
            let mut resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(FetchError::Status {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            if let Some(total) = resp.content_length() {
                progress.set_total(total);
            }

            let mut body = Vec::new();
            while let Some(chunk) = resp.chunk().await? {
                progress.inc(chunk.len() as u64);
                body.extend_from_slice(&chunk);
            }
            decode_text(source, body)
        }
        Source::File(path) => {
            let body = tokio::fs::read(path).await?;
            progress.set_total(body.len() as u64);
            progress.inc(body.len() as u64);
            decode_text(source, body)
        }
    }
}

/// Reads and decodes the document at `source`.
///
/// # Errors
///
/// Returns [`FetchError`] if the document cannot be read or decoded.
pub async fn fetch_document(
    client: &reqwest::Client,
    source: &Source,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Document, FetchError> {
    progress.set_message(format!("Fetching {source}"));
    let text = fetch_text(client, source, progress).await?;
    log::info!("Fetched {} bytes from {source}", text.len());

    let document = Document::parse(&text)?;
    progress.finish(format!("Loaded {source}"));
    Ok(document)
}
