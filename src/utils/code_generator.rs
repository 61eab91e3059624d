//! Deterministic short code derivation.
//!
//! A code is a hex prefix of the SHA-256 digest of the URL's raw bytes, so
//! the same URL always yields the same code and re-submissions are idempotent
//! without any uniqueness check beyond find-by-url.

use sha2::{Digest, Sha256};

/// Default code length in hex characters.
///
/// 5 hex characters carry 20 bits, so distinct URLs start colliding with
/// noticeable probability past a few thousand records. The link service
/// resolves a collision by extending the prefix one character at a time (see
/// [`code_with_length`]) rather than widening this default.
pub const MIN_CODE_LEN: usize = 5;

/// Upper bound for collision extension: the full digest in hex.
pub const MAX_CODE_LEN: usize = 64;

/// Derives the default-length short code for a URL.
///
/// Deterministic and pure: repeated calls with the same input return the
/// same code.
pub fn generate_code(url: &str) -> String {
    code_with_length(url, MIN_CODE_LEN)
}

/// Derives a code of `len` hex characters for a URL.
///
/// Longer codes are strict extensions of shorter ones for the same URL, which
/// is what makes extend-on-collision stable: an existing record's code is
/// always a prefix of what this returns for its URL.
///
/// `len` is clamped to [`MAX_CODE_LEN`].
pub fn code_with_length(url: &str, len: usize) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(len.min(MAX_CODE_LEN));
    hex
}
