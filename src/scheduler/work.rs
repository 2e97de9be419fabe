use crate::fingerprint::{fingerprint_url, normalize_url};
use crate::FingerprintResult;
use url::Url;

/// Which lane a unit of work belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkKind {
    /// Category-discovery work: fetching a listing page to find directories
    /// and products
    Category,

    /// Product-extraction work under one directory
    Product {
        /// Path of the directory the product belongs to
        directory: String,
    },

    /// Anything else the crawl needs to fetch
    Other,
}

/// One schedulable unit of crawl work
///
/// The payload is the normalized URL to fetch; the fingerprint is derived
/// from it at construction and is the identity used for admission dedup.
/// Callers keep the fingerprint from a dequeued item to report its terminal
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    fingerprint: String,
    url: Url,
    kind: WorkKind,
}

impl WorkItem {
    /// Builds a category-discovery item from a raw URL
    pub fn category(raw_url: &str) -> FingerprintResult<Self> {
        Self::build(raw_url, WorkKind::Category)
    }

    /// Builds a product-extraction item belonging to `directory`
    pub fn product(raw_url: &str, directory: &str) -> FingerprintResult<Self> {
        Self::build(
            raw_url,
            WorkKind::Product {
                directory: directory.to_string(),
            },
        )
    }

    /// Builds a catch-all item from a raw URL
    pub fn other(raw_url: &str) -> FingerprintResult<Self> {
        Self::build(raw_url, WorkKind::Other)
    }

    fn build(raw_url: &str, kind: WorkKind) -> FingerprintResult<Self> {
        let url = normalize_url(raw_url)?;
        let fingerprint = fingerprint_url(&url);
        Ok(Self {
            fingerprint,
            url,
            kind,
        })
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> &WorkKind {
        &self.kind
    }

    /// The owning directory path for product work, `None` otherwise
    pub fn directory(&self) -> Option<&str> {
        match &self.kind {
            WorkKind::Product { directory } => Some(directory),
            _ => None,
        }
    }
}
