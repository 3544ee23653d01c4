// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional TOML file overriding resolved channel settings.
//!
//! ```toml
//! [general]
//! base_url = "https://example.com/podcast"
//!
//! [channel]
//! title = "Weekly Talks"
//! language = "en-us"
//!
//! [itunes]
//! owner_email = "joe@example.com"
//! ```

use std::path::Path;

use serde::Deserialize;

use super::resolver::{ChannelConfig, Configuration, ItunesConfig};
use crate::error::ConfigError;

const KNOWN_SECTIONS: [(&str, &[&str]); 3] = [
    ("general", &["base_url"]),
    (
        "channel",
        &[
            "title",
            "description",
            "link",
            "language",
            "webmaster",
            "webMaster",
            "docs",
        ],
    ),
    (
        "itunes",
        &[
            "author",
            "subtitle",
            "summary",
            "explicit",
            "image",
            "category",
            "owner_email",
            "owner_name",
        ],
    ),
];

/// Contents of a feed configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub general: GeneralOverrides,
    pub channel: ChannelConfig,
    pub itunes: ItunesConfig,
}

/// Settings of the `[general]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralOverrides {
    pub base_url: Option<String>,
}

impl ConfigFile {
    /// Load a configuration file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file = Self::parse(&content).map_err(|e| ConfigError::FileParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(file)
    }

    /// Parse configuration file contents
    ///
    /// Unknown tables and keys are ignored with a warning.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }
        toml::from_str(content)
    }
}

impl Configuration {
    /// Apply the settings of a configuration file
    pub fn with_file(self, file: ConfigFile) -> Result<Self, ConfigError> {
        let mut config = match file.general.base_url.as_deref() {
            Some(base_url) => self.with_base_url(base_url)?,
            None => self,
        };

        config.channel = config.channel.overlay(file.channel);
        config.itunes = config.itunes.overlay(file.itunes);
        Ok(config)
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    for (section, value) in raw {
        let Some((_, keys)) = KNOWN_SECTIONS.iter().find(|(name, _)| *name == section.as_str()) else {
            tracing::warn!(section = %section, "Unknown section in config file, ignoring");
            continue;
        };

        if let Some(table) = value.as_table() {
            for key in table.keys() {
                if !keys.contains(&key.as_str()) {
                    tracing::warn!(section = %section, key = %key, "Unknown key in config file, ignoring");
                }
            }
        }
    }
}
