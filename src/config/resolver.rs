// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Name of the generated feed file inside the input directory
pub const FEED_FILE_NAME: &str = "feed.xml";

/// Name of the cover image expected next to the feed
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Path segment marking the root of a user's web directory
const PUBLIC_HTML: &str = "public_html";

/// Complete configuration for one feed generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub general: GeneralConfig,
    pub channel: ChannelConfig,
    pub itunes: ItunesConfig,
}

/// Paths and URLs the feed is generated from and published under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Directory that is scanned for audio files
    pub input_dir: PathBuf,
    /// Where the feed is written, always inside `input_dir`
    pub output_file: PathBuf,
    /// URL scheme used for audio URLs (`http` unless overridden)
    pub base_scheme: String,
    /// Host (and optional port) serving the input directory
    pub base_host: String,
    /// Unencoded URL path of the input directory on `base_host`
    pub base_url_path: String,
    /// Absolute URL of the input directory
    pub base_url: String,
    /// Absolute URL of the generated feed
    pub feed_url: String,
}

/// Channel-level RSS fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub language: Option<String>,
    #[serde(alias = "webMaster")]
    pub webmaster: Option<String>,
    pub docs: Option<String>,
}

/// Channel-level iTunes extension fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ItunesConfig {
    pub author: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub explicit: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub owner_email: Option<String>,
    pub owner_name: Option<String>,
}

impl ChannelConfig {
    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn overlay(self, other: ChannelConfig) -> Self {
        Self {
            title: other.title.or(self.title),
            description: other.description.or(self.description),
            link: other.link.or(self.link),
            language: other.language.or(self.language),
            webmaster: other.webmaster.or(self.webmaster),
            docs: other.docs.or(self.docs),
        }
    }
}

impl ItunesConfig {
    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn overlay(self, other: ItunesConfig) -> Self {
        Self {
            author: other.author.or(self.author),
            subtitle: other.subtitle.or(self.subtitle),
            summary: other.summary.or(self.summary),
            explicit: other.explicit.or(self.explicit),
            image: other.image.or(self.image),
            category: other.category.or(self.category),
            owner_email: other.owner_email.or(self.owner_email),
            owner_name: other.owner_name.or(self.owner_name),
        }
    }
}

/// Derive a complete configuration from a local directory path
///
/// Pure function of its inputs: the path is only inspected as a string. A path
/// below a `public_html` directory is mapped to `http://<host>/~<user>/<rest>`;
/// any other path is appended verbatim after `/~<user>/`.
pub fn resolve(local_path: &Path, host_name: &str, user_name: &str) -> Configuration {
    let local = normalize(local_path);
    let segments: Vec<&str> = local.split('/').filter(|s| !s.is_empty()).collect();
    let base_dir_name = segments.last().copied().unwrap_or_default();

    let under_public_html = match segments.iter().position(|s| *s == PUBLIC_HTML) {
        Some(pos) => segments[pos + 1..].join("/"),
        None => local.clone(),
    };

    let base_url_path = if under_public_html.is_empty() {
        format!("/~{user_name}")
    } else {
        format!("/~{user_name}/{under_public_html}")
    };
    let base_url = format!("http://{host_name}{base_url_path}");
    let input_dir = PathBuf::from(&local);

    Configuration {
        general: GeneralConfig {
            output_file: input_dir.join(FEED_FILE_NAME),
            input_dir,
            base_scheme: "http".to_string(),
            base_host: host_name.to_string(),
            base_url_path,
            feed_url: format!("{base_url}/{FEED_FILE_NAME}"),
            base_url: base_url.clone(),
        },
        channel: ChannelConfig {
            title: Some(title_case(base_dir_name)).filter(|t| !t.is_empty()),
            description: Some(format!("Podcast generated from '{local}'")),
            ..Default::default()
        },
        itunes: ItunesConfig {
            image: Some(default_image(&base_url)),
            ..Default::default()
        },
    }
}

impl Configuration {
    /// Replace the channel title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.channel.title = Some(title.into());
        self
    }

    /// Publish the feed under a different base URL
    ///
    /// Recomputes every URL derived from the base. The cover image follows
    /// along only while it still points at the default location.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: e,
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::BaseUrlWithoutHost(base_url.to_string()))?;

        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let path = percent_decode_str(url.path())
            .decode_utf8_lossy()
            .trim_end_matches('/')
            .to_string();

        let had_default_image =
            self.itunes.image.as_deref() == Some(default_image(&self.general.base_url).as_str());

        let general = &mut self.general;
        general.base_scheme = url.scheme().to_string();
        general.base_host = host;
        general.base_url = format!("{}://{}{}", general.base_scheme, general.base_host, path);
        general.base_url_path = path;
        general.feed_url = format!("{}/{FEED_FILE_NAME}", general.base_url);

        if had_default_image {
            self.itunes.image = Some(default_image(&self.general.base_url));
        }

        Ok(self)
    }
}

fn default_image(base_url: &str) -> String {
    format!("{base_url}/{COVER_FILE_NAME}")
}

/// Render the path as a string without trailing separators
fn normalize(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() && raw.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Uppercase the first letter of every word, lowercase the rest
///
/// A word starts after any character that is not a letter.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }

    result
}
