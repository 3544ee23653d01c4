use std::path::PathBuf;
use std::sync::Arc;

/// Events emitted during feed generation for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The input directory is being listed
    ScanningDirectory { path: PathBuf },

    /// Directory listing finished
    ScanCompleted {
        /// Number of entries with a recognized audio extension
        eligible_files: usize,
    },

    /// Tags of a file are about to be read
    ReadingTags {
        file_name: String,
        /// Index of this file in scan order
        index: usize,
        /// Total number of eligible files
        total: usize,
    },

    /// Tags could not be read; the file is still added with default metadata
    TagsUnavailable { file_name: String, error: String },

    /// A file was left out of the feed
    FileSkipped { file_name: String, error: String },

    /// No audio file made it into the feed; an empty feed is written
    NoEpisodesFound {
        path: PathBuf,
        /// Audio files found but skipped; zero when none were found
        skipped_files: usize,
    },

    /// The feed file has been written
    FeedWritten {
        path: PathBuf,
        feed_url: String,
        item_count: usize,
    },
}

/// Trait for reporting progress events during feed generation.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
