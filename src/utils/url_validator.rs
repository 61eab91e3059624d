//! Submitted-URL validation.
//!
//! A link submission must parse as an absolute URL with an http(s) scheme and
//! a host. Anything else is rejected before any store or code-generator call.

use url::Url;

/// Errors that can occur while validating a submitted URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,
}

/// Validates a submitted URL and returns its canonical string form.
///
/// The canonical form is the parsed URL re-serialized, so `http://example.com`
/// and `http://example.com/` map to the same stored value and deduplicate to
/// one record.
///
/// # Security
///
/// Rejects non-HTTP(S) schemes such as `javascript:`, `data:`, and `file:`.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for strings that do not
/// parse as an absolute URL, [`UrlValidationError::UnsupportedProtocol`] for
/// non-HTTP(S) schemes, and [`UrlValidationError::MissingHost`] for URLs
/// without a host.
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url.to_string())
}
