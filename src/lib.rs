//! Shelf-Sweep: directory-priority scheduling for catalog crawls
//!
//! This crate implements the scheduling core of a hierarchical product-catalog
//! crawler: all product work in the current directory reaches a terminal
//! outcome before priority advances to the next directory, even though
//! directories and products are discovered incrementally and processed by
//! concurrent workers.

pub mod catalog;
pub mod config;
pub mod fingerprint;
pub mod report;
pub mod scheduler;

use thiserror::Error;

/// Main error type for Shelf-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Empty {0} identifier")]
    EmptyIdentifier(&'static str),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while deriving a work fingerprint from a URL
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Shelf-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fingerprint derivation
pub type FingerprintResult<T> = std::result::Result<T, FingerprintError>;

// Re-export commonly used types
pub use catalog::{DirectoryProgress, DirectoryRegistry, DirectoryStatus, ProductStatus};
pub use config::Config;
pub use fingerprint::{fingerprint, fingerprint_url, normalize_url};
pub use scheduler::{
    CrawlEngine, Discovery, Disposition, HandlerOutcome, PriorityScheduler, SchedulerStats,
    WorkHandler, WorkItem, WorkKind,
};
