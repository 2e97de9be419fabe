use crate::catalog::{DirectoryNode, DirectoryProgress, DirectoryStatus};
use crate::catalog::{ProductRecord, ProductStatus};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Source of truth for the directory tree and completion bookkeeping
///
/// The registry owns every [`DirectoryNode`] and [`ProductRecord`] for the
/// lifetime of a crawl session. Directory promotion order is maintained in a
/// `BTreeSet` keyed by `(level, discovery sequence, path)`, so selecting the
/// next priority directory is a logarithmic operation no matter how many
/// directories the crawl has discovered.
///
/// The registry is a plain single-threaded structure. The scheduler that owns
/// it provides the locking.
#[derive(Debug, Default)]
pub struct DirectoryRegistry {
    /// Directory path -> node
    directories: HashMap<String, DirectoryNode>,

    /// Product fingerprint -> record
    products: HashMap<String, ProductRecord>,

    /// `(level, seq, path)` for every non-completed directory
    open_index: BTreeSet<(u32, u64, String)>,

    /// Path of the directory currently favored for product work
    active: Option<String>,

    /// Next discovery sequence number
    next_seq: u64,

    directories_completed: u64,
    products_completed: u64,
    products_failed: u64,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directory discovered during category crawling
    ///
    /// Idempotent: a second call for a known path is a no-op that returns
    /// `false`, keeps the original level and parent, and never moves status
    /// backward.
    pub fn register_directory(&mut self, path: &str, level: u32, parent: Option<&str>) -> bool {
        if self.directories.contains_key(path) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let node = DirectoryNode::new(path, level, parent, seq);
        self.open_index.insert((level, seq, path.to_string()));
        self.directories.insert(path.to_string(), node);

        info!(path, level, "discovered directory");
        true
    }

    /// Records a product discovered under `path`
    ///
    /// Discovery must never fail: an unknown `path` is auto-registered at
    /// level 1. Returns whether the fingerprint was newly seen. The first
    /// directory a fingerprint is discovered under keeps it; later sightings
    /// under other paths are no-ops.
    pub fn register_product(&mut self, path: &str, fingerprint: &str) -> bool {
        if self.products.contains_key(fingerprint) {
            debug!(fingerprint, "product already tracked");
            return false;
        }

        if !self.directories.contains_key(path) {
            debug!(path, "auto-registering directory for product discovery");
            self.register_directory(path, 1, None);
        }

        self.products
            .insert(fingerprint.to_string(), ProductRecord::new(fingerprint, path));

        // The node exists at this point, registered above if it was unknown.
        if let Some(node) = self.directories.get_mut(path) {
            node.products_discovered += 1;
        }

        debug!(path, fingerprint, "discovered product");
        true
    }

    /// Marks a product's extraction as successful
    pub fn complete_product(&mut self, fingerprint: &str) -> bool {
        self.resolve_product(fingerprint, ProductStatus::Completed)
    }

    /// Marks a product's extraction as failed
    pub fn fail_product(&mut self, fingerprint: &str) -> bool {
        self.resolve_product(fingerprint, ProductStatus::Failed)
    }

    /// Moves a product to a terminal status and re-evaluates its directory
    ///
    /// Unknown fingerprints and repeated reports for an already-terminal
    /// product are tolerated no-ops: retried fetches legitimately produce
    /// duplicate signals. Only the `Pending -> terminal` transition counts,
    /// which keeps `completed + failed` from ever exceeding the number of
    /// discovered products.
    fn resolve_product(&mut self, fingerprint: &str, outcome: ProductStatus) -> bool {
        let Some(record) = self.products.get_mut(fingerprint) else {
            debug!(fingerprint, "ignoring report for unknown fingerprint");
            return false;
        };

        if record.status.is_terminal() {
            debug!(fingerprint, "ignoring duplicate terminal report");
            return false;
        }

        record.status = outcome;
        let directory = record.directory.clone();

        match outcome {
            ProductStatus::Completed => self.products_completed += 1,
            ProductStatus::Failed => self.products_failed += 1,
            ProductStatus::Pending => unreachable!("resolve_product only takes terminal statuses"),
        }

        if let Some(node) = self.directories.get_mut(&directory) {
            match outcome {
                ProductStatus::Completed => node.products_completed += 1,
                ProductStatus::Failed => node.products_failed += 1,
                ProductStatus::Pending => {}
            }
        }

        self.check_directory_completion(&directory);
        true
    }

    /// Declares product discovery finished for `path`
    ///
    /// Directories registered with zero products are never auto-completed;
    /// closing is the explicit signal that the membership is final. A closed
    /// directory completes as soon as all its products are terminal, which
    /// for an empty one is immediately.
    pub fn close_directory(&mut self, path: &str) -> bool {
        let Some(node) = self.directories.get_mut(path) else {
            debug!(path, "ignoring close for unknown directory");
            return false;
        };

        node.closed = true;
        self.check_directory_completion(path);
        true
    }

    fn check_directory_completion(&mut self, path: &str) {
        let Some(node) = self.directories.get_mut(path) else {
            return;
        };

        if !node.status.is_open() || !node.completion_holds() {
            return;
        }

        node.status = DirectoryStatus::Completed;
        node.completed_at = Some(Utc::now());
        info!(
            path,
            completed = node.products_completed,
            failed = node.products_failed,
            total = node.products_discovered,
            "directory completed"
        );
        let key = (node.level, node.seq, node.path.clone());

        self.directories_completed += 1;
        self.open_index.remove(&key);
        if self.active.as_deref() == Some(path) {
            self.active = None;
        }
    }

    /// Returns the directory currently favored for product work
    ///
    /// A still-open active directory is returned unchanged so the focus does
    /// not thrash between siblings. Otherwise the best open candidate by
    /// `(level, discovery sequence)` is promoted. `None` means every known
    /// directory is completed.
    pub fn next_priority_directory(&mut self) -> Option<String> {
        if let Some(path) = self.active.clone() {
            if self
                .directories
                .get(&path)
                .is_some_and(|node| node.status.is_open())
            {
                return Some(path);
            }
            self.active = None;
        }

        let (_, _, path) = self.open_index.iter().next().cloned()?;
        if let Some(node) = self.directories.get_mut(&path) {
            if node.status == DirectoryStatus::Discovered {
                node.status = DirectoryStatus::Active;
            }
        }

        info!(path, "switching priority directory");
        self.active = Some(path.clone());
        Some(path)
    }

    pub fn is_directory_completed(&self, path: &str) -> bool {
        self.directories
            .get(path)
            .is_some_and(|node| node.status == DirectoryStatus::Completed)
    }

    /// Progress snapshot for one directory, `None` if the path is unknown
    pub fn progress(&self, path: &str) -> Option<DirectoryProgress> {
        self.directories.get(path).map(DirectoryNode::progress)
    }

    /// Progress for every directory, shallowest level first, most complete
    /// first within a level
    pub fn progress_report(&self) -> Vec<DirectoryProgress> {
        let mut report: Vec<DirectoryProgress> =
            self.directories.values().map(DirectoryNode::progress).collect();

        report.sort_by(|a, b| {
            a.level.cmp(&b.level).then_with(|| {
                b.completion_rate
                    .partial_cmp(&a.completion_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.path.cmp(&b.path))
            })
        });
        report
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            directories_discovered: self.directories.len() as u64,
            directories_completed: self.directories_completed,
            directories_remaining: self.directories.len() as u64 - self.directories_completed,
            products_discovered: self.products.len() as u64,
            products_completed: self.products_completed,
            products_failed: self.products_failed,
            active_directory: self.active.clone(),
        }
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

/// Aggregate registry counters, for observability and tests
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub directories_discovered: u64,
    pub directories_completed: u64,
    pub directories_remaining: u64,
    pub products_discovered: u64,
    pub products_completed: u64,
    pub products_failed: u64,
    pub active_directory: Option<String>,
}
