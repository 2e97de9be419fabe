//! Progress rendering for logs and operator inspection
//!
//! Turns scheduler snapshots into the plain-text summary a crawl operator
//! reads while a run is in flight.

use crate::catalog::DirectoryProgress;
use crate::scheduler::SchedulerStats;

/// Renders the per-directory completion table
///
/// Expects the slice already sorted the way
/// `PriorityScheduler::progress_report` returns it: shallowest level first,
/// most complete first within a level.
pub fn render_progress(report: &[DirectoryProgress]) -> String {
    let mut out = String::new();
    out.push_str("=== Directory Progress ===\n\n");

    if report.is_empty() {
        out.push_str("No directories discovered yet.\n");
        return out;
    }

    for progress in report {
        out.push_str(&format!(
            "  [L{}] {} {} ({}/{} done, {} failed, {:.0}%)\n",
            progress.level,
            progress.path,
            progress.status,
            progress.completed_products,
            progress.total_products,
            progress.failed_products,
            progress.completion_rate * 100.0
        ));
    }
    out
}

/// Renders scheduler totals: registry counters, lane depths, current focus
pub fn render_stats(stats: &SchedulerStats) -> String {
    let mut out = String::new();
    out.push_str("=== Scheduler Statistics ===\n\n");

    out.push_str(&format!(
        "Priority scheduling: {}\n",
        if stats.priority_enabled { "on" } else { "off" }
    ));
    out.push_str(&format!(
        "Current priority directory: {}\n\n",
        stats.current_priority_directory.as_deref().unwrap_or("none")
    ));

    let d = &stats.directories;
    out.push_str("Directories:\n");
    out.push_str(&format!("  Discovered: {}\n", d.directories_discovered));
    out.push_str(&format!("  Completed: {}\n", d.directories_completed));
    out.push_str(&format!("  Remaining: {}\n\n", d.directories_remaining));

    out.push_str("Products:\n");
    out.push_str(&format!("  Discovered: {}\n", d.products_discovered));
    out.push_str(&format!("  Completed: {}\n", d.products_completed));
    out.push_str(&format!("  Failed: {}\n\n", d.products_failed));

    let q = &stats.queue;
    out.push_str("Queue:\n");
    out.push_str(&format!("  Category pending: {}\n", q.category_pending));
    out.push_str(&format!(
        "  Product pending: {} across {} lanes\n",
        q.total_product_pending,
        q.product_pending.len()
    ));
    out.push_str(&format!("  Other pending: {}\n", q.other_pending));
    out.push_str(&format!("  Total pending: {}\n", q.total_pending));
    out.push_str(&format!("  Admitted this session: {}\n", q.total_admitted));

    out
}

/// Prints the per-directory completion table to stdout
pub fn print_progress(report: &[DirectoryProgress]) {
    print!("{}", render_progress(report));
}

/// Prints scheduler totals to stdout
pub fn print_stats(stats: &SchedulerStats) {
    print!("{}", render_stats(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::PriorityScheduler;

    #[test]
    fn test_render_progress_empty() {
        let rendered = render_progress(&[]);
        assert!(rendered.contains("No directories discovered yet."));
    }

    #[test]
    fn test_render_progress_lists_directories() {
        let mut scheduler = PriorityScheduler::new();
        scheduler.discover_directory("/electronics", 1, None).unwrap();
        scheduler
            .add_product_work("https://example.com/p/1", "/electronics")
            .unwrap();

        let rendered = render_progress(&scheduler.progress_report());
        assert!(rendered.contains("/electronics"));
        assert!(rendered.contains("[L1]"));
        assert!(rendered.contains("0/1 done"));
    }

    #[test]
    fn test_render_stats() {
        let mut scheduler = PriorityScheduler::new();
        scheduler
            .add_product_work("https://example.com/p/1", "/a")
            .unwrap();
        let item = scheduler.next().unwrap();
        scheduler.report_completed(item.fingerprint());

        let rendered = render_stats(&scheduler.stats());
        assert!(rendered.contains("Priority scheduling: on"));
        assert!(rendered.contains("Admitted this session: 1"));
        assert!(rendered.contains("Completed: 1"));
    }
}
