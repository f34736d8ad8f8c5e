//! Fetch utilities for icon and ground overlay images.
//!
//! Consolidates the three-way fetch (HTTP, `data:` URL, local file) used by
//! the threaded image loader. The layer core never calls these directly; it
//! only sees a cache lookup and a download trigger.

use base64::Engine;
use std::fs;
use std::time::Duration;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("kmlayer/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while fetching asset bytes.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be created or the request failed.
    #[error("request for '{url}' failed: {source}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("HTTP error {status} for '{url}'")]
    Status {
        /// URL that was requested.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// A `data:` URL was missing its payload separator.
    #[error("invalid data URL: missing comma")]
    MalformedDataUrl,
    /// A `data:` URL used an encoding other than base64.
    #[error("unsupported data URL encoding '{0}'")]
    UnsupportedEncoding(String),
    /// Base64 payload could not be decoded.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A local file could not be read.
    #[error("failed to read '{path}': {source}")]
    File {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Fetch asset bytes from `url`.
///
/// `http://` and `https://` go over the network, `data:` URLs are decoded in
/// place, and anything else (including `file://`) is read from disk.
///
/// # Errors
///
/// Returns a [`FetchError`] describing the failing step.
pub fn fetch_image_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        fetch_bytes(url)
    } else if url.starts_with("data:") {
        decode_data_url(url)
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read(path).map_err(|source| FetchError::File {
            path: path.to_string(),
            source,
        })
    }
}

/// Fetch a URL and return its body as raw bytes.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created, the request fails,
/// the response has a non-success status, or the body cannot be read.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(request_error)?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(request_error)
}

/// Decode a base64 `data:` URL and return its payload as raw bytes.
///
/// # Errors
///
/// Returns an error if the URL has no payload separator, uses a non-base64
/// encoding, or carries an invalid base64 payload.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, FetchError> {
    let data_url = url.trim_start_matches("data:");
    let (metadata, data) = data_url
        .split_once(',')
        .ok_or(FetchError::MalformedDataUrl)?;

    if metadata.ends_with(";base64") {
        Ok(base64::engine::general_purpose::STANDARD.decode(data)?)
    } else {
        Err(FetchError::UnsupportedEncoding(metadata.to_string()))
    }
}
