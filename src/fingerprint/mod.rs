//! Work fingerprints derived from normalized URLs
//!
//! Admission control needs a stable identity per unit of work: the same
//! product page proposed twice must map to the same fingerprint no matter
//! how the link was spelled. This module canonicalizes URLs and hashes the
//! canonical components into a hex digest.

mod normalize;

pub use normalize::normalize_url;

use crate::FingerprintResult;
use sha2::{Digest, Sha256};
use url::Url;

/// Computes the fingerprint of an already-normalized URL
///
/// The digest covers scheme, host, port, path, and query. Two URLs that
/// normalize identically always produce the same fingerprint.
pub fn fingerprint_url(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.scheme().as_bytes());
    hasher.update(b"://");
    hasher.update(url.host_str().unwrap_or_default().as_bytes());
    if let Some(port) = url.port() {
        hasher.update(b":");
        hasher.update(port.to_string().as_bytes());
    }
    hasher.update(url.path().as_bytes());
    if let Some(query) = url.query() {
        hasher.update(b"?");
        hasher.update(query.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Normalizes a raw URL string and fingerprints the result
///
/// # Arguments
///
/// * `raw` - The URL string as discovered on a page
///
/// # Returns
///
/// * `Ok(String)` - The hex fingerprint of the canonical URL
/// * `Err(FingerprintError)` - The input could not be canonicalized
pub fn fingerprint(raw: &str) -> FingerprintResult<String> {
    let url = normalize_url(raw)?;
    Ok(fingerprint_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint("https://example.com/p/1").unwrap();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_stable_across_spellings() {
        let a = fingerprint("https://www.example.com/p/1/?utm_source=mail").unwrap();
        let b = fingerprint("https://example.com/p/1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_distinguishes_paths() {
        let a = fingerprint("https://example.com/p/1").unwrap();
        let b = fingerprint("https://example.com/p/2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_distinguishes_query() {
        let a = fingerprint("https://example.com/search?page=1").unwrap();
        let b = fingerprint("https://example.com/search?page=2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_includes_port() {
        let a = fingerprint("https://example.com:8443/p/1").unwrap();
        let b = fingerprint("https://example.com/p/1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_rejects_bad_input() {
        assert!(fingerprint("mailto:sales@example.com").is_err());
    }
}
