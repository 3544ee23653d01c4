pub mod config;
pub mod error;
pub mod feed;
pub mod generate;
pub mod progress;
pub mod scan;
pub mod tags;

// Re-export main types for convenience
pub use config::{ConfigFile, Configuration, resolve};
pub use error::{ConfigError, EpisodeError, GenerateError, ScanError, SerializeError, TagError};
pub use feed::{FeedDocument, PubDateMode, build_feed, serialize_feed};
pub use generate::{GenerateOptions, GenerateResult, generate_feed, resolve_config};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use scan::scan_input_dir;
pub use tags::{EpisodeMetadata, Id3Reader, TagReader, TagSource, extract_metadata};
