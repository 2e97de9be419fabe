//! Operator-facing progress and statistics output

mod progress;

pub use progress::{print_progress, print_stats, render_progress, render_stats};
