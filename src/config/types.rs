use serde::Deserialize;

/// Main configuration structure for Shelf-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerSettings,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Scheduling behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Whether dequeue favors the current priority directory. Off, the
    /// scheduler degrades to a plain FIFO across lanes.
    #[serde(rename = "priority-enabled", default = "default_priority_enabled")]
    pub priority_enabled: bool,
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Number of concurrent crawl workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Sleep between polls when the queue is empty (milliseconds)
    #[serde(rename = "idle-poll-interval-ms", default = "default_idle_poll_interval_ms")]
    pub idle_poll_interval_ms: u64,

    /// Consecutive empty polls (with nothing in flight) before a worker exits
    #[serde(rename = "max-idle-polls", default = "default_max_idle_polls")]
    pub max_idle_polls: u32,
}

fn default_priority_enabled() -> bool {
    true
}

fn default_workers() -> usize {
    4
}

fn default_idle_poll_interval_ms() -> u64 {
    50
}

fn default_max_idle_polls() -> u32 {
    10
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            priority_enabled: default_priority_enabled(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            idle_poll_interval_ms: default_idle_poll_interval_ms(),
            max_idle_polls: default_max_idle_polls(),
        }
    }
}
