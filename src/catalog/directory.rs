use chrono::{DateTime, Utc};
use std::fmt;

/// Represents the lifecycle stage of a catalog directory
///
/// Transitions only move forward: `Discovered -> Active -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryStatus {
    /// Directory is known but not yet favored for product work
    Discovered,

    /// Directory is the current focus of product extraction
    Active,

    /// Every discovered product in the directory reached a terminal outcome
    Completed,
}

impl DirectoryStatus {
    /// Returns true if the directory still has (or may still receive) work
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DirectoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks one directory node of the catalog hierarchy
///
/// The registry exclusively owns these. `level` is hierarchy depth with 1 the
/// shallowest; `seq` is the discovery sequence number used to break priority
/// ties between directories on the same level deterministically.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Unique directory path, e.g. `/electronics/phones`
    pub path: String,

    /// Hierarchy depth, 1 = top level
    pub level: u32,

    /// Parent directory path, reference only
    pub parent: Option<String>,

    /// When this directory was first discovered
    pub discovered_at: DateTime<Utc>,

    /// Discovery sequence number, monotonic per registry
    pub seq: u64,

    pub status: DirectoryStatus,

    /// Number of distinct products discovered under this directory
    pub products_discovered: u64,

    /// Products that reached a successful terminal outcome
    pub products_completed: u64,

    /// Products that reached a failed terminal outcome
    pub products_failed: u64,

    /// Set once discovery for this path is declared finished
    pub closed: bool,

    /// When the completion invariant first held
    pub completed_at: Option<DateTime<Utc>>,
}

impl DirectoryNode {
    pub fn new(path: &str, level: u32, parent: Option<&str>, seq: u64) -> Self {
        Self {
            path: path.to_string(),
            level,
            parent: parent.map(str::to_string),
            discovered_at: Utc::now(),
            seq,
            status: DirectoryStatus::Discovered,
            products_discovered: 0,
            products_completed: 0,
            products_failed: 0,
            closed: false,
            completed_at: None,
        }
    }

    /// Products that reached either terminal outcome
    pub fn products_resolved(&self) -> u64 {
        self.products_completed + self.products_failed
    }

    /// Checks whether the completion invariant holds
    ///
    /// A directory completes once every discovered product is terminal. A
    /// directory with zero products completes only after an explicit close,
    /// since an empty membership usually means discovery has not run yet.
    pub fn completion_holds(&self) -> bool {
        self.products_resolved() >= self.products_discovered
            && (self.products_discovered > 0 || self.closed)
    }

    /// Fraction of discovered products that are terminal, clamped to [0, 1]
    pub fn completion_rate(&self) -> f64 {
        let resolved = self.products_resolved().min(self.products_discovered);
        resolved as f64 / self.products_discovered.max(1) as f64
    }

    pub fn progress(&self) -> DirectoryProgress {
        DirectoryProgress {
            path: self.path.clone(),
            level: self.level,
            status: self.status,
            total_products: self.products_discovered,
            completed_products: self.products_completed,
            failed_products: self.products_failed,
            remaining_products: self
                .products_discovered
                .saturating_sub(self.products_resolved()),
            completion_rate: self.completion_rate(),
        }
    }
}

/// Point-in-time progress snapshot for one directory
#[derive(Debug, Clone)]
pub struct DirectoryProgress {
    pub path: String,
    pub level: u32,
    pub status: DirectoryStatus,
    pub total_products: u64,
    pub completed_products: u64,
    pub failed_products: u64,
    pub remaining_products: u64,
    pub completion_rate: f64,
}
