mod extract;
mod reader;

pub use extract::{EpisodeMetadata, extract_metadata};
pub use reader::{Id3Reader, TagReader, TagSource};
