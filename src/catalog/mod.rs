//! Catalog tree tracking and completion bookkeeping
//!
//! This module is the source of truth for what the crawl has discovered:
//!
//! - `DirectoryNode` / `DirectoryStatus`: one node per catalog directory,
//!   with forward-only status transitions
//! - `ProductRecord` / `ProductStatus`: one record per discovered product,
//!   keyed by fingerprint
//! - `DirectoryRegistry`: owns both, enforces the completion invariant, and
//!   selects the current priority directory

mod directory;
mod product;
mod registry;

// Re-export main types
pub use directory::{DirectoryNode, DirectoryProgress, DirectoryStatus};
pub use product::{ProductRecord, ProductStatus};
pub use registry::{DirectoryRegistry, RegistryStats};
