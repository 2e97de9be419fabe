use crate::catalog::{DirectoryProgress, DirectoryRegistry, RegistryStats};
use crate::scheduler::{QueueStats, WorkItem, WorkQueue};
use crate::{Result, SweepError};
use tracing::{debug, info};

/// Pull-based scheduler that favors one directory at a time
///
/// Composes the [`DirectoryRegistry`] and the [`WorkQueue`]: the registry
/// decides which directory is currently favored, the queue hands out work
/// with that preference, and terminal reports flow back into the registry to
/// advance the favored directory.
///
/// The scheduler holds plain mutable state and performs no I/O; share it
/// between workers behind a single `Mutex` and keep lock holds short. `next`
/// never blocks, it returns `None` when nothing is ready and the caller owns
/// the polling cadence.
#[derive(Debug)]
pub struct PriorityScheduler {
    registry: DirectoryRegistry,
    queue: WorkQueue,

    /// Directory favored at the last pull, refreshed lazily by `next`
    current_priority: Option<String>,

    enabled: bool,
}

impl Default for PriorityScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self {
            registry: DirectoryRegistry::new(),
            queue: WorkQueue::new(),
            current_priority: None,
            enabled: true,
        }
    }

    /// Sets whether directory priority is applied at dequeue time
    pub fn with_priority_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Records a directory found during category crawling
    pub fn discover_directory(
        &mut self,
        path: &str,
        level: u32,
        parent: Option<&str>,
    ) -> Result<()> {
        require(path, "directory path")?;
        self.registry.register_directory(path, level, parent);
        Ok(())
    }

    /// Records a product found under `path`, bookkeeping only
    ///
    /// Returns whether the fingerprint was newly seen. This does not admit
    /// any work; pair it with `add_product_work` when the product page needs
    /// fetching.
    pub fn discover_product(&mut self, fingerprint: &str, path: &str) -> Result<bool> {
        require(fingerprint, "product fingerprint")?;
        require(path, "directory path")?;
        Ok(self.registry.register_product(path, fingerprint))
    }

    /// Admits category-discovery work; returns false on duplicate admission
    pub fn add_category_work(&mut self, url: &str) -> Result<bool> {
        require(url, "work URL")?;
        let item = WorkItem::category(url)?;
        Ok(self.queue.enqueue(item))
    }

    /// Admits product work under `path`, registering the product first
    ///
    /// The registry learns about the product even when the queue rejects the
    /// admission, so membership counts stay accurate across re-proposals.
    pub fn add_product_work(&mut self, url: &str, path: &str) -> Result<bool> {
        require(url, "work URL")?;
        require(path, "directory path")?;
        let item = WorkItem::product(url, path)?;
        self.registry.register_product(path, item.fingerprint());
        Ok(self.queue.enqueue(item))
    }

    /// Admits catch-all work; returns false on duplicate admission
    pub fn add_other_work(&mut self, url: &str) -> Result<bool> {
        require(url, "work URL")?;
        let item = WorkItem::other(url)?;
        Ok(self.queue.enqueue(item))
    }

    /// Hands out the next unit of work, if any
    ///
    /// With priority enabled the favored directory is refreshed from the
    /// registry first, then its product lane is preferred. Disabled, this is
    /// a plain FIFO pull across lanes.
    pub fn next(&mut self) -> Option<WorkItem> {
        if !self.enabled {
            return self.queue.dequeue(None);
        }

        self.current_priority = self.registry.next_priority_directory();
        let item = self.queue.dequeue(self.current_priority.as_deref());

        if let Some(item) = &item {
            debug!(
                url = %item.url(),
                priority_directory = self.current_priority.as_deref().unwrap_or("none"),
                "dispatching work"
            );
        }
        item
    }

    /// Reports successful extraction for a dequeued item
    ///
    /// The only path by which directory status advances. Unknown fingerprints
    /// are tolerated no-ops so retried fetches can report freely.
    pub fn report_completed(&mut self, fingerprint: &str) -> bool {
        self.registry.complete_product(fingerprint)
    }

    /// Reports failed extraction for a dequeued item
    pub fn report_failed(&mut self, fingerprint: &str) -> bool {
        self.registry.fail_product(fingerprint)
    }

    /// Declares product discovery finished for `path`
    pub fn close_directory(&mut self, path: &str) -> Result<bool> {
        require(path, "directory path")?;
        Ok(self.registry.close_directory(path))
    }

    /// Turns directory-priority dequeue on
    pub fn enable(&mut self) {
        self.enabled = true;
        info!("priority scheduling enabled");
    }

    /// Falls back to plain FIFO dequeue
    pub fn disable(&mut self) {
        self.enabled = false;
        info!("priority scheduling disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Progress snapshot for one directory
    pub fn progress(&self, path: &str) -> Option<DirectoryProgress> {
        self.registry.progress(path)
    }

    /// Progress for every known directory, shallowest first
    pub fn progress_report(&self) -> Vec<DirectoryProgress> {
        self.registry.progress_report()
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            priority_enabled: self.enabled,
            current_priority_directory: self.current_priority.clone(),
            directories: self.registry.stats(),
            queue: self.queue.stats(),
        }
    }
}

/// Combined registry and queue counters
#[derive(Debug, Clone)]
pub struct SchedulerStats {
    pub priority_enabled: bool,
    pub current_priority_directory: Option<String>,
    pub directories: RegistryStats,
    pub queue: QueueStats,
}

fn require(value: &str, what: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SweepError::EmptyIdentifier(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifiers_fail_fast() {
        let mut scheduler = PriorityScheduler::new();

        assert!(matches!(
            scheduler.discover_directory("", 1, None),
            Err(SweepError::EmptyIdentifier("directory path"))
        ));
        assert!(matches!(
            scheduler.discover_product("  ", "/a"),
            Err(SweepError::EmptyIdentifier("product fingerprint"))
        ));
        assert!(matches!(
            scheduler.add_product_work("", "/a"),
            Err(SweepError::EmptyIdentifier("work URL"))
        ));
        assert!(matches!(
            scheduler.close_directory(""),
            Err(SweepError::EmptyIdentifier("directory path"))
        ));
    }

    #[test]
    fn test_add_product_work_registers_membership() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.discover_directory("/electronics", 1, None).unwrap();

        assert!(scheduler
            .add_product_work("https://example.com/p/1", "/electronics")
            .unwrap());

        let progress = scheduler.progress("/electronics").unwrap();
        assert_eq!(progress.total_products, 1);
    }

    #[test]
    fn test_duplicate_admission_returns_false_but_keeps_membership() {
        let mut scheduler = PriorityScheduler::new();

        assert!(scheduler
            .add_product_work("https://example.com/p/1", "/a")
            .unwrap());
        assert!(!scheduler
            .add_product_work("https://example.com/p/1", "/a")
            .unwrap());

        assert_eq!(scheduler.progress("/a").unwrap().total_products, 1);
        assert_eq!(scheduler.stats().queue.total_admitted, 1);
    }

    #[test]
    fn test_next_prefers_priority_directory() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.discover_directory("/electronics", 1, None).unwrap();
        scheduler.discover_directory("/books", 2, None).unwrap();

        scheduler
            .add_product_work("https://example.com/books/1", "/books")
            .unwrap();
        scheduler
            .add_product_work("https://example.com/electronics/1", "/electronics")
            .unwrap();

        let item = scheduler.next().unwrap();
        assert_eq!(item.directory(), Some("/electronics"));
        assert_eq!(
            scheduler.stats().current_priority_directory.as_deref(),
            Some("/electronics")
        );
    }

    #[test]
    fn test_disabled_scheduler_is_fifo() {
        let mut scheduler = PriorityScheduler::new().with_priority_enabled(false);
        scheduler.discover_directory("/electronics", 1, None).unwrap();
        scheduler.discover_directory("/books", 2, None).unwrap();

        scheduler
            .add_product_work("https://example.com/books/1", "/books")
            .unwrap();
        scheduler
            .add_product_work("https://example.com/electronics/1", "/electronics")
            .unwrap();

        // Admission order wins, the deep directory was queued first
        let item = scheduler.next().unwrap();
        assert_eq!(item.directory(), Some("/books"));
    }

    #[test]
    fn test_reports_advance_priority() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.discover_directory("/a", 1, None).unwrap();
        scheduler.discover_directory("/b", 2, None).unwrap();

        scheduler
            .add_product_work("https://example.com/a/1", "/a")
            .unwrap();
        scheduler
            .add_product_work("https://example.com/b/1", "/b")
            .unwrap();

        let first = scheduler.next().unwrap();
        assert_eq!(first.directory(), Some("/a"));
        assert!(scheduler.report_completed(first.fingerprint()));

        let second = scheduler.next().unwrap();
        assert_eq!(second.directory(), Some("/b"));
    }

    #[test]
    fn test_unknown_report_is_noop() {
        let mut scheduler = PriorityScheduler::new();
        assert!(!scheduler.report_completed("never-admitted"));
        assert!(!scheduler.report_failed(""));
    }

    #[test]
    fn test_enable_disable_roundtrip() {
        let mut scheduler = PriorityScheduler::new();
        assert!(scheduler.is_enabled());

        scheduler.disable();
        assert!(!scheduler.is_enabled());
        assert!(!scheduler.stats().priority_enabled);

        scheduler.enable();
        assert!(scheduler.is_enabled());
    }

    #[test]
    fn test_next_on_empty_scheduler() {
        let mut scheduler = PriorityScheduler::new();
        assert_eq!(scheduler.next(), None);
    }
}
