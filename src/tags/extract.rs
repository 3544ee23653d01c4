use std::path::Path;

use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::reader::{TagReader, TagSource};

/// Descriptive metadata of one audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMetadata {
    /// Embedded title, or the file name when untagged
    pub title: String,
    /// Free-text description from the comment and description fields
    pub description: Option<String>,
    pub artist: Option<String>,
}

impl EpisodeMetadata {
    /// Metadata for a file whose tags could not be read
    pub fn untagged(file_name: &str) -> Self {
        Self {
            title: file_name.to_string(),
            description: None,
            artist: None,
        }
    }

    /// Build metadata from a tag, falling back to the file name for the title
    pub fn from_tags(tags: &dyn TagSource, file_name: &str) -> Self {
        Self {
            title: tags.title().unwrap_or_else(|| file_name.to_string()),
            description: merge_description(tags.comment(), tags.description()),
            artist: tags.artist(),
        }
    }
}

/// Combine the comment and description fields without repeating text
///
/// When both are present and differ, the description wins.
fn merge_description(comment: Option<String>, description: Option<String>) -> Option<String> {
    match (comment, description) {
        (_, Some(description)) => Some(description),
        (Some(comment), None) => Some(comment),
        (None, None) => None,
    }
}

/// Extract episode metadata from an audio file
///
/// Never fails: unreadable or malformed tags are logged and reported, and the
/// file name stands in for the title.
pub fn extract_metadata<R: TagReader + ?Sized>(
    reader: &R,
    path: &Path,
    reporter: &SharedProgressReporter,
) -> EpisodeMetadata {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match reader.read_tags(path) {
        Ok(Some(tags)) => EpisodeMetadata::from_tags(tags.as_ref(), &file_name),
        Ok(None) => {
            tracing::debug!(file = %file_name, "No tags found");
            EpisodeMetadata::untagged(&file_name)
        }
        Err(e) => {
            tracing::warn!(file = %file_name, error = %e, "Could not read tags, using file name");
            reporter.report(ProgressEvent::TagsUnavailable {
                file_name: file_name.clone(),
                error: e.to_string(),
            });
            EpisodeMetadata::untagged(&file_name)
        }
    }
}
