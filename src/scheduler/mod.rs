//! Work scheduling for directory-priority crawls
//!
//! This module contains the pull side of the crawl:
//! - `WorkItem` / `WorkKind`: fingerprinted units of crawl work
//! - `WorkQueue`: admission-controlled three-lane FIFO
//! - `PriorityScheduler`: queue plus catalog registry behind one pull API
//! - `CrawlEngine` / `WorkHandler`: tokio worker pool and the seam to the
//!   external fetch/parse collaborator

mod engine;
mod priority;
mod queue;
mod work;

pub use engine::{
    CrawlEngine, Discovery, Disposition, EngineReport, HandlerOutcome, SharedScheduler,
    WorkHandler,
};
pub use priority::{PriorityScheduler, SchedulerStats};
pub use queue::{QueueStats, WorkQueue};
pub use work::{WorkItem, WorkKind};
