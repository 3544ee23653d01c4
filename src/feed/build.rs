// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::OsStr;
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

use crate::config::{COVER_FILE_NAME, Configuration, GeneralConfig};
use crate::scan::AUDIO_MIME_TYPE;
use crate::tags::EpisodeMetadata;

/// Category attached to every item
pub const ITEM_CATEGORY: &str = "Podcasts";

const FALLBACK_CATEGORY: &str = "Uncategorized";
const FALLBACK_OWNER_EMAIL: &str = "no email";
const FALLBACK_OWNER_NAME: &str = "no owner name";

/// Seconds from the Unix epoch to 2000-01-01T00:00:00Z
const SEQUENTIAL_EPOCH_SECS: i64 = 946_684_800;

/// Characters escaped in audio URL paths; `/` separators are kept
const PATH_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How item publication dates are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PubDateMode {
    /// Use each file's last modification time
    #[default]
    Modified,
    /// One day apart from 2000-01-01 in scan order, so date-sorting
    /// clients keep the directory order
    Sequential,
}

/// An eligible audio file with everything needed to build its item
#[derive(Debug, Clone)]
pub struct EpisodeFile {
    /// Location on disk; its file name becomes the audio URL
    pub path: PathBuf,
    /// File name for display, lossily decoded
    pub file_name: String,
    pub metadata: EpisodeMetadata,
    /// Size on disk in bytes at scan time
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// A complete feed: one channel owning its items in scan order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    pub channel: FeedChannel,
    pub items: Vec<FeedItem>,
}

/// Channel header of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: Option<String>,
    pub web_master: Option<String>,
    pub docs: Option<String>,
    pub pub_date: String,
    pub itunes: ItunesChannel,
}

/// iTunes extension fields of the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItunesChannel {
    pub author: Option<String>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub explicit: Option<String>,
    pub image: String,
    pub category: String,
    pub owner_email: String,
    pub owner_name: String,
}

/// A single feed entry describing one audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    /// The audio URL, reused as identifier
    pub guid: String,
    pub description: String,
    pub enclosure: Enclosure,
    pub category: String,
    pub pub_date: String,
}

/// The downloadable audio attached to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    pub mime_type: String,
}

/// Build the feed document for a list of episodes
///
/// `episodes` must already be in scan order; items keep that order.
/// `generated_at` becomes the channel publication date.
pub fn build_feed(
    config: &Configuration,
    episodes: &[EpisodeFile],
    pub_dates: PubDateMode,
    generated_at: DateTime<Utc>,
) -> FeedDocument {
    let items = episodes
        .iter()
        .enumerate()
        .map(|(index, episode)| {
            let pub_date = match pub_dates {
                PubDateMode::Modified => episode.modified,
                PubDateMode::Sequential => sequential_pub_date(index),
            };
            build_item(&config.general, episode, pub_date)
        })
        .collect();

    FeedDocument {
        channel: build_channel(config, generated_at),
        items,
    }
}

fn build_channel(config: &Configuration, generated_at: DateTime<Utc>) -> FeedChannel {
    let general = &config.general;
    let channel = &config.channel;
    let itunes = &config.itunes;

    for (field, value) in [
        ("channel.language", &channel.language),
        ("channel.webmaster", &channel.webmaster),
        ("channel.docs", &channel.docs),
        ("itunes.author", &itunes.author),
        ("itunes.subtitle", &itunes.subtitle),
        ("itunes.summary", &itunes.summary),
        ("itunes.explicit", &itunes.explicit),
    ] {
        if value.is_none() {
            tracing::debug!(field, "Field not configured, omitting");
        }
    }

    FeedChannel {
        title: channel.title.clone().unwrap_or_default(),
        description: channel.description.clone().unwrap_or_default(),
        link: channel
            .link
            .clone()
            .unwrap_or_else(|| general.base_url.clone()),
        language: channel.language.clone(),
        web_master: channel.webmaster.clone(),
        docs: channel.docs.clone(),
        pub_date: generated_at.to_rfc2822(),
        itunes: ItunesChannel {
            author: itunes.author.clone(),
            subtitle: itunes.subtitle.clone(),
            summary: itunes.summary.clone(),
            explicit: itunes.explicit.clone(),
            image: itunes
                .image
                .clone()
                .unwrap_or_else(|| format!("{}/{COVER_FILE_NAME}", general.base_url)),
            category: itunes
                .category
                .clone()
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            owner_email: itunes
                .owner_email
                .clone()
                .unwrap_or_else(|| FALLBACK_OWNER_EMAIL.to_string()),
            owner_name: itunes
                .owner_name
                .clone()
                .unwrap_or_else(|| FALLBACK_OWNER_NAME.to_string()),
        },
    }
}

fn build_item(general: &GeneralConfig, episode: &EpisodeFile, pub_date: DateTime<Utc>) -> FeedItem {
    let url = audio_url(general, episode.path.file_name().unwrap_or_default());

    FeedItem {
        title: episode.metadata.title.clone(),
        guid: url.clone(),
        description: item_description(&episode.metadata, &episode.file_name),
        enclosure: Enclosure {
            url,
            length: episode.size,
            mime_type: AUDIO_MIME_TYPE.to_string(),
        },
        category: ITEM_CATEGORY.to_string(),
        pub_date: pub_date.to_rfc2822(),
    }
}

/// Public URL of an audio file in the input directory
///
/// The path is percent-encoded; existing `/` separators are left intact.
/// File names are encoded from their raw bytes, so names that are not
/// valid UTF-8 still resolve to the file on disk.
pub fn audio_url(general: &GeneralConfig, file_name: impl AsRef<OsStr>) -> String {
    let mut path = general.base_url_path.as_bytes().to_vec();
    path.push(b'/');
    path.extend_from_slice(file_name.as_ref().as_encoded_bytes());

    format!(
        "{}://{}{}",
        general.base_scheme,
        general.base_host,
        percent_encode(&path, PATH_ESCAPE)
    )
}

/// Item description: tag text, artist, then the file name
fn item_description(metadata: &EpisodeMetadata, file_name: &str) -> String {
    let mut lines = Vec::with_capacity(3);
    if let Some(description) = &metadata.description {
        lines.push(description.clone());
    }
    if let Some(artist) = &metadata.artist {
        lines.push(format!("(by {artist})"));
    }
    lines.push(format!("(file name: {file_name})"));
    lines.join("\n")
}

/// Publication date of the item at `index` in sequential mode
pub fn sequential_pub_date(index: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
        + TimeDelta::seconds(SEQUENTIAL_EPOCH_SECS)
        + TimeDelta::days(index as i64)
}
