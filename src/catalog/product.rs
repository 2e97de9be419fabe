use chrono::{DateTime, Utc};
use std::fmt;

/// Terminal-state tracking for one discovered product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductStatus {
    /// Discovered, outcome not yet reported
    Pending,

    /// Extraction succeeded
    Completed,

    /// Extraction failed
    Failed,
}

impl ProductStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One discovered product, keyed by fingerprint in the registry
///
/// A product belongs to exactly one directory; the first discovery wins.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub fingerprint: String,

    /// Path of the owning directory
    pub directory: String,

    pub discovered_at: DateTime<Utc>,

    pub status: ProductStatus,
}

impl ProductRecord {
    pub fn new(fingerprint: &str, directory: &str) -> Self {
        Self {
            fingerprint: fingerprint.to_string(),
            directory: directory.to_string(),
            discovered_at: Utc::now(),
            status: ProductStatus::Pending,
        }
    }
}
