//! Fixture loading from various sources.
//!
//! Handles loading records, descriptors and documents from files, strings,
//! and HTTP URLs.

use std::path::Path;

use serde_json::Value;

use crate::dynamic::Descriptor;
use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load JSON from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load JSON from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load JSON from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the server
/// answers with an error status.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    tracing::debug!(url, "fetching fixture source");
    let response = client.get(url).send().map_err(network_error)?;

    // Check for HTTP errors before parsing
    let response = response.error_for_status().map_err(network_error)?;

    response.json().map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load JSON from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_json_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_json_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_json(Path::new(source))
    }
}

/// Load a mapping descriptor from a file path or URL.
///
/// # Errors
///
/// Returns any loading error, or `LoadError::InvalidDescriptor` if the JSON
/// does not have the descriptor shape.
pub fn load_descriptor(source: &str) -> Result<Descriptor, LoadError> {
    let value = load_json_auto(source)?;
    parse_descriptor(value)
}

/// Interpret a JSON value as a mapping descriptor.
pub fn parse_descriptor(value: Value) -> Result<Descriptor, LoadError> {
    serde_json::from_value(value).map_err(|source| LoadError::InvalidDescriptor { source })
}
