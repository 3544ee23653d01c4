// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::path::Path;

use lofty::config::ParseOptions;
use lofty::id3::v2::Id3v2Tag;
use lofty::mpeg::MpegFile;
use lofty::prelude::*;

use crate::error::TagError;

/// User-defined text frame holding a free-text description
const DESCRIPTION_FRAME: &str = "DESCRIPTION";

/// User-defined text frame holding a free-text comment
const COMMENT_FRAME: &str = "COMMENT";

/// Read-only view of the tag fields used to describe an episode
///
/// Every accessor returns `None` when the field is absent or empty.
pub trait TagSource {
    fn title(&self) -> Option<String>;
    fn artist(&self) -> Option<String>;
    fn comment(&self) -> Option<String>;
    fn description(&self) -> Option<String>;
}

/// Tag reading abstraction for testability
pub trait TagReader {
    /// Read the embedded tags of an audio file
    ///
    /// Returns `Ok(None)` for a readable file that carries no tag.
    fn read_tags(&self, path: &Path) -> Result<Option<Box<dyn TagSource>>, TagError>;
}

/// Default tag reader for MPEG audio files using lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3Reader;

impl TagReader for Id3Reader {
    fn read_tags(&self, path: &Path) -> Result<Option<Box<dyn TagSource>>, TagError> {
        let mut file = File::open(path).map_err(|e| TagError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Audio properties are never used; decoding them rejects tagged files
        // without valid MPEG frames.
        let options = ParseOptions::new().read_properties(false);
        let mpeg = MpegFile::read_from(&mut file, options).map_err(|e| {
            TagError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        Ok(mpeg
            .id3v2()
            .cloned()
            .map(|tag| Box::new(tag) as Box<dyn TagSource>))
    }
}

impl TagSource for Id3v2Tag {
    fn title(&self) -> Option<String> {
        Accessor::title(self).and_then(|v| join_values(&v, " "))
    }

    fn artist(&self) -> Option<String> {
        Accessor::artist(self).and_then(|v| join_values(&v, " "))
    }

    fn comment(&self) -> Option<String> {
        self.get_user_text(COMMENT_FRAME)
            .and_then(|v| join_values(v, "\n"))
            .or_else(|| Accessor::comment(self).and_then(|v| join_values(&v, "\n")))
    }

    fn description(&self) -> Option<String> {
        self.get_user_text(DESCRIPTION_FRAME)
            .and_then(|v| join_values(v, "\n"))
    }
}

/// Join the values of a multi-value text frame
///
/// ID3v2.4 separates multiple values with NUL characters.
fn join_values(raw: &str, separator: &str) -> Option<String> {
    let joined = raw
        .split('\0')
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(separator);

    Some(joined).filter(|v| !v.trim().is_empty())
}
