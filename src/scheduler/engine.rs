use crate::config::EngineConfig;
use crate::scheduler::{PriorityScheduler, WorkItem};
use crate::{Result, SweepError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Scheduler shared between crawl workers
pub type SharedScheduler = Arc<Mutex<PriorityScheduler>>;

/// Something found while handling one unit of work
///
/// Handlers report what a fetched page revealed; the engine feeds it back
/// into the scheduler before reporting the item's outcome.
#[derive(Debug, Clone)]
pub enum Discovery {
    /// A new catalog directory
    Directory {
        path: String,
        level: u32,
        parent: Option<String>,
    },

    /// A further listing page to crawl
    CategoryWork { url: String },

    /// A product page belonging to `directory`
    ProductWork { url: String, directory: String },

    /// Anything else worth fetching
    OtherWork { url: String },
}

/// Terminal outcome of handling one work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Completed,
    Failed,
}

/// What a handler returns for one dequeued item
#[derive(Debug, Clone)]
pub struct HandlerOutcome {
    pub disposition: Disposition,
    pub discoveries: Vec<Discovery>,
}

impl HandlerOutcome {
    pub fn completed() -> Self {
        Self {
            disposition: Disposition::Completed,
            discoveries: Vec::new(),
        }
    }

    pub fn failed() -> Self {
        Self {
            disposition: Disposition::Failed,
            discoveries: Vec::new(),
        }
    }

    pub fn with_discoveries(mut self, discoveries: Vec<Discovery>) -> Self {
        self.discoveries = discoveries;
        self
    }
}

/// External collaborator that fetches and parses one work item
///
/// Implementations own all I/O: HTTP, parsing, persistence. The engine calls
/// `handle` outside the scheduler lock, so a slow fetch never blocks other
/// workers' pulls. Every dequeued item gets exactly one terminal report from
/// the engine based on the returned disposition; a handler that panics leaks
/// its item and permanently stalls the owning directory, which an external
/// watchdog has to surface.
#[async_trait]
pub trait WorkHandler: Send + Sync {
    async fn handle(&self, item: &WorkItem) -> HandlerOutcome;
}

/// Totals for one engine run
#[derive(Debug, Clone, Default)]
pub struct EngineReport {
    pub items_processed: u64,
    pub items_completed: u64,
    pub items_failed: u64,
}

/// Worker pool driving a shared scheduler
///
/// Spawns `workers` tasks that repeatedly pull from the scheduler, hand the
/// item to the [`WorkHandler`], feed discoveries back, and report the
/// outcome. Workers back off when the queue is empty and exit once it stays
/// empty with no work in flight anywhere, so discoveries made by a straggler
/// are never orphaned.
pub struct CrawlEngine {
    scheduler: SharedScheduler,
    handler: Arc<dyn WorkHandler>,
    config: EngineConfig,
}

impl CrawlEngine {
    pub fn new(
        scheduler: SharedScheduler,
        handler: Arc<dyn WorkHandler>,
        config: EngineConfig,
    ) -> Self {
        Self {
            scheduler,
            handler,
            config,
        }
    }

    /// Runs the pool until all admitted work is drained
    pub async fn run(&self) -> Result<EngineReport> {
        info!(workers = self.config.workers, "starting crawl engine");

        let in_flight = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::with_capacity(self.config.workers);

        for worker_id in 0..self.config.workers {
            let scheduler = Arc::clone(&self.scheduler);
            let handler = Arc::clone(&self.handler);
            let in_flight = Arc::clone(&in_flight);
            let completed = Arc::clone(&completed);
            let failed = Arc::clone(&failed);
            let poll_interval = Duration::from_millis(self.config.idle_poll_interval_ms);
            let max_idle_polls = self.config.max_idle_polls;

            let handle = tokio::spawn(async move {
                debug!(worker_id, "worker started");
                let mut idle_polls = 0u32;

                loop {
                    // The in-flight count moves up under the same lock as the
                    // dequeue, so an idle check can never miss a just-taken
                    // item.
                    let item = {
                        let mut scheduler = scheduler.lock().unwrap();
                        let item = scheduler.next();
                        if item.is_some() {
                            in_flight.fetch_add(1, Ordering::SeqCst);
                        }
                        item
                    };

                    let Some(item) = item else {
                        // Only count an idle poll when nobody is mid-handler;
                        // in-flight work may still produce discoveries.
                        if in_flight.load(Ordering::SeqCst) == 0 {
                            idle_polls += 1;
                            if idle_polls >= max_idle_polls {
                                break;
                            }
                        } else {
                            idle_polls = 0;
                        }
                        tokio::time::sleep(poll_interval).await;
                        continue;
                    };

                    idle_polls = 0;

                    debug!(worker_id, url = %item.url(), "handling work item");
                    let outcome = handler.handle(&item).await;

                    {
                        let mut scheduler = scheduler.lock().unwrap();
                        for discovery in outcome.discoveries {
                            apply_discovery(&mut scheduler, discovery);
                        }
                        match outcome.disposition {
                            Disposition::Completed => {
                                scheduler.report_completed(item.fingerprint());
                                completed.fetch_add(1, Ordering::SeqCst);
                            }
                            Disposition::Failed => {
                                scheduler.report_failed(item.fingerprint());
                                failed.fetch_add(1, Ordering::SeqCst);
                            }
                        }
                    }

                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }

                debug!(worker_id, "worker finished");
            });

            handles.push(handle);
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| SweepError::Worker(e.to_string()))?;
        }

        let report = EngineReport {
            items_completed: completed.load(Ordering::SeqCst),
            items_failed: failed.load(Ordering::SeqCst),
            items_processed: completed.load(Ordering::SeqCst) + failed.load(Ordering::SeqCst),
        };

        info!(
            processed = report.items_processed,
            completed = report.items_completed,
            failed = report.items_failed,
            "crawl engine drained"
        );
        Ok(report)
    }
}

/// Feeds one discovery back into the scheduler
///
/// Rejected discoveries (bad URLs, empty identifiers) are logged and
/// dropped; one malformed link must not fail the whole item.
fn apply_discovery(scheduler: &mut PriorityScheduler, discovery: Discovery) {
    let result = match discovery {
        Discovery::Directory {
            path,
            level,
            parent,
        } => scheduler
            .discover_directory(&path, level, parent.as_deref())
            .map(|()| true),
        Discovery::CategoryWork { url } => scheduler.add_category_work(&url),
        Discovery::ProductWork { url, directory } => scheduler.add_product_work(&url, &directory),
        Discovery::OtherWork { url } => scheduler.add_other_work(&url),
    };

    if let Err(e) = result {
        warn!(error = %e, "discovery rejected");
    }
}
