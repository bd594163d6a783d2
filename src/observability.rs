//! Logging setup and export counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Log line layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Install the global tracing subscriber; `RUST_LOG` overrides the filter
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Full => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Counters for one export run
#[derive(Debug, Default)]
pub struct ExportStats {
    directories_created: AtomicU64,
    files_written: AtomicU64,
    bytes_written: AtomicU64,
    metadata_written: AtomicU64,
    metadata_removed: AtomicU64,
    nodes_skipped: AtomicU64,
}

impl ExportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory_created(&self) {
        self.directories_created.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "directories_created", "Counter incremented");
    }

    pub fn file_written(&self, bytes: u64) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
        tracing::trace!(counter = "files_written", bytes, "Counter incremented");
    }

    pub fn metadata_written(&self) {
        self.metadata_written.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "metadata_written", "Counter incremented");
    }

    pub fn metadata_removed(&self) {
        self.metadata_removed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "metadata_removed", "Counter incremented");
    }

    pub fn node_skipped(&self) {
        self.nodes_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(counter = "nodes_skipped", "Counter incremented");
    }

    /// Zero every counter before a new run
    pub fn reset(&self) {
        for counter in [
            &self.directories_created,
            &self.files_written,
            &self.bytes_written,
            &self.metadata_written,
            &self.metadata_removed,
            &self.nodes_skipped,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ExportSummary {
        ExportSummary {
            directories_created: self.directories_created.load(Ordering::Relaxed),
            files_written: self.files_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            metadata_written: self.metadata_written.load(Ordering::Relaxed),
            metadata_removed: self.metadata_removed.load(Ordering::Relaxed),
            nodes_skipped: self.nodes_skipped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub directories_created: u64,
    pub files_written: u64,
    pub bytes_written: u64,
    pub metadata_written: u64,
    pub metadata_removed: u64,
    pub nodes_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let stats = ExportStats::new();
        stats.directory_created();
        stats.file_written(10);
        stats.file_written(5);
        stats.metadata_written();
        stats.node_skipped();

        let summary = stats.snapshot();
        assert_eq!(summary.directories_created, 1);
        assert_eq!(summary.files_written, 2);
        assert_eq!(summary.bytes_written, 15);
        assert_eq!(summary.metadata_written, 1);
        assert_eq!(summary.metadata_removed, 0);
        assert_eq!(summary.nodes_skipped, 1);
    }

    #[test]
    fn test_reset_clears_counters() {
        let stats = ExportStats::new();
        stats.directory_created();
        stats.file_written(3);
        stats.metadata_removed();

        stats.reset();
        let summary = stats.snapshot();
        assert_eq!(summary.directories_created, 0);
        assert_eq!(summary.files_written, 0);
        assert_eq!(summary.bytes_written, 0);
        assert_eq!(summary.metadata_removed, 0);
    }
}
