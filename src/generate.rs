// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::{ConfigFile, Configuration, host_name, resolve, user_name};
use crate::error::{ConfigError, EpisodeError, GenerateError};
use crate::feed::{EpisodeFile, PubDateMode, build_feed, serialize_feed};
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::scan::scan_input_dir;
use crate::tags::{TagReader, extract_metadata};

/// Options for feed generation
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Channel title replacing the one derived from the directory name
    pub title: Option<String>,
    /// Base URL replacing the one derived from the directory path
    pub base_url: Option<String>,
    /// Host name (None = detect from the environment)
    pub host: Option<String>,
    /// User name (None = detect from the environment)
    pub user: Option<String>,
    /// TOML file with channel settings
    pub config_file: Option<PathBuf>,
    /// Indent the generated XML
    pub pretty: bool,
    /// How item publication dates are derived
    pub pub_dates: PubDateMode,
}

/// Result of a generation run
#[derive(Debug)]
pub struct GenerateResult {
    /// Public URL of the written feed
    pub feed_url: String,
    /// Path of the written feed file
    pub output_file: PathBuf,
    /// Number of items in the feed
    pub item_count: usize,
    /// Files left out of the feed (file name, reason)
    pub skipped_files: Vec<(String, EpisodeError)>,
}

/// Resolve the configuration for an input directory
///
/// Applies, in order: defaults derived from the path, the config file, then
/// the explicit title and base URL overrides.
pub fn resolve_config(
    input_dir: &Path,
    options: &GenerateOptions,
) -> Result<Configuration, ConfigError> {
    if input_dir.as_os_str().is_empty() {
        return Err(ConfigError::MissingInputDir);
    }

    let input_dir = std::path::absolute(input_dir).map_err(|e| ConfigError::AbsolutePathFailed {
        path: input_dir.to_path_buf(),
        source: e,
    })?;

    let host = host_name(options.host.as_deref());
    let user = user_name(options.user.as_deref());
    let mut config = resolve(&input_dir, &host, &user);

    if let Some(path) = &options.config_file {
        config = config.with_file(ConfigFile::load(path)?)?;
    }
    if let Some(base_url) = &options.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(title) = &options.title {
        config = config.with_title(title.as_str());
    }

    tracing::debug!(
        input_dir = %config.general.input_dir.display(),
        feed_url = %config.general.feed_url,
        "Resolved configuration"
    );

    Ok(config)
}

/// Generate the podcast feed for a directory of audio files
///
/// This is the main entry point for the library. It:
/// 1. Resolves the configuration
/// 2. Lists the audio files of the input directory in name order
/// 3. Reads size, modification time and tags of each file
/// 4. Builds and serializes the feed document
/// 5. Writes the feed into the input directory
///
/// A file that cannot be inspected is skipped; only directory-level,
/// serialization and write failures abort the run.
pub fn generate_feed<R: TagReader + ?Sized>(
    reader: &R,
    input_dir: &Path,
    options: &GenerateOptions,
    reporter: SharedProgressReporter,
) -> Result<GenerateResult, GenerateError> {
    let config = resolve_config(input_dir, options)?;
    let input_dir = &config.general.input_dir;

    reporter.report(ProgressEvent::ScanningDirectory {
        path: input_dir.clone(),
    });

    let paths = scan_input_dir(input_dir)?;

    reporter.report(ProgressEvent::ScanCompleted {
        eligible_files: paths.len(),
    });

    let (episodes, skipped_files) = collect_episodes(reader, &paths, &reporter);

    if episodes.is_empty() {
        if skipped_files.is_empty() {
            tracing::warn!(dir = %input_dir.display(), "No audio files found, writing empty feed");
        } else {
            tracing::warn!(
                dir = %input_dir.display(),
                skipped = skipped_files.len(),
                "All audio files were skipped, writing empty feed"
            );
        }
        reporter.report(ProgressEvent::NoEpisodesFound {
            path: input_dir.clone(),
            skipped_files: skipped_files.len(),
        });
    }

    let document = build_feed(&config, &episodes, options.pub_dates, Utc::now());
    let bytes = serialize_feed(&document, options.pretty)?;

    let output_file = config.general.output_file.clone();
    std::fs::write(&output_file, bytes).map_err(|e| GenerateError::WriteFailed {
        path: output_file.clone(),
        source: e,
    })?;

    let item_count = document.items.len();
    tracing::info!(
        path = %output_file.display(),
        items = item_count,
        "Wrote feed"
    );

    reporter.report(ProgressEvent::FeedWritten {
        path: output_file.clone(),
        feed_url: config.general.feed_url.clone(),
        item_count,
    });

    Ok(GenerateResult {
        feed_url: config.general.feed_url,
        output_file,
        item_count,
        skipped_files,
    })
}

/// Inspect every audio file, keeping scan order
///
/// Returns the usable episodes and the skipped files with their errors.
fn collect_episodes<R: TagReader + ?Sized>(
    reader: &R,
    paths: &[PathBuf],
    reporter: &SharedProgressReporter,
) -> (Vec<EpisodeFile>, Vec<(String, EpisodeError)>) {
    let total = paths.len();
    let mut episodes = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (size, modified) = match stat_file(path) {
            Ok(stat) => stat,
            Err(error) => {
                tracing::warn!(file = %file_name, error = %error, "Skipping file");
                reporter.report(ProgressEvent::FileSkipped {
                    file_name: file_name.clone(),
                    error: error.to_string(),
                });
                skipped.push((file_name, error));
                continue;
            }
        };

        reporter.report(ProgressEvent::ReadingTags {
            file_name: file_name.clone(),
            index,
            total,
        });

        let metadata = extract_metadata(reader, path, reporter);

        episodes.push(EpisodeFile {
            path: path.clone(),
            file_name,
            metadata,
            size,
            modified,
        });
    }

    (episodes, skipped)
}

/// Size and modification time of a regular file
fn stat_file(path: &Path) -> Result<(u64, DateTime<Utc>), EpisodeError> {
    let metadata_failed = |e: std::io::Error| EpisodeError::MetadataFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let meta = std::fs::metadata(path).map_err(metadata_failed)?;
    if !meta.is_file() {
        return Err(EpisodeError::NotAFile(path.to_path_buf()));
    }

    let modified = meta.modified().map_err(metadata_failed)?;
    Ok((meta.len(), DateTime::<Utc>::from(modified)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::error::{ScanError, TagError};
    use crate::progress::{NoopReporter, ProgressReporter};
    use crate::tags::TagSource;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// Reads tags from a `<name>.tags` sidecar: `title|artist|comment|description`
    struct SidecarReader;

    struct SidecarTags(Vec<Option<String>>);

    impl TagSource for SidecarTags {
        fn title(&self) -> Option<String> {
            self.0[0].clone()
        }
        fn artist(&self) -> Option<String> {
            self.0[1].clone()
        }
        fn comment(&self) -> Option<String> {
            self.0[2].clone()
        }
        fn description(&self) -> Option<String> {
            self.0[3].clone()
        }
    }

    impl TagReader for SidecarReader {
        fn read_tags(&self, path: &Path) -> Result<Option<Box<dyn TagSource>>, TagError> {
            let sidecar = path.with_extension("tags");
            if !sidecar.exists() {
                return Ok(None);
            }
            let content =
                std::fs::read_to_string(&sidecar).map_err(|e| TagError::OpenFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if content == "corrupt" {
                return Err(TagError::OpenFailed {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("corrupt tag"),
                });
            }
            let fields = content
                .split('|')
                .map(|f| Some(f.to_string()).filter(|f| !f.is_empty()))
                .chain(std::iter::repeat(None))
                .take(4)
                .collect();
            Ok(Some(Box::new(SidecarTags(fields))))
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            host: Some("baz.com".to_string()),
            user: Some("joe".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn resolve_config_rejects_empty_path() {
        let result = resolve_config(Path::new(""), &options());
        assert!(matches!(result, Err(ConfigError::MissingInputDir)));
    }

    #[test]
    fn resolve_config_applies_overrides_in_order() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("podgen.toml");
        std::fs::write(
            &config_path,
            "[general]\nbase_url = \"http://file.example.com/a\"\n[channel]\ntitle = \"From File\"\n",
        )
        .unwrap();

        let options = GenerateOptions {
            title: Some("From Flag".to_string()),
            base_url: Some("https://flag.example.com/b".to_string()),
            config_file: Some(config_path),
            ..options()
        };

        let config = resolve_config(dir.path(), &options).unwrap();

        assert_eq!(config.channel.title, Some("From Flag".to_string()));
        assert_eq!(config.general.feed_url, "https://flag.example.com/b/feed.xml");
    }

    #[test]
    fn generate_writes_feed_in_name_order() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"bbbb").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"aa").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        std::fs::write(dir.path().join("a.tags"), "Alpha|Joe||").unwrap();

        let result =
            generate_feed(&SidecarReader, dir.path(), &options(), NoopReporter::shared()).unwrap();

        assert_eq!(result.item_count, 2);
        assert!(result.skipped_files.is_empty());
        assert_eq!(result.output_file, dir.path().join("feed.xml"));
        assert!(result.feed_url.starts_with("http://baz.com/~joe/"));
        assert!(result.feed_url.ends_with("/feed.xml"));

        let xml = std::fs::read(&result.output_file).unwrap();
        let channel = rss::Channel::read_from(&xml[..]).unwrap();
        let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
        assert_eq!(titles, vec!["Alpha", "b.mp3"]);
        assert_eq!(
            channel.items()[0].description(),
            Some("(by Joe)\n(file name: a.mp3)")
        );
        assert_eq!(channel.items()[1].enclosure().unwrap().length(), "4");
    }

    #[test]
    fn corrupt_tags_do_not_abort_run() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("01.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("01.tags"), "corrupt").unwrap();
        std::fs::write(dir.path().join("02.mp3"), b"x").unwrap();

        let reporter = std::sync::Arc::new(RecordingReporter::default());
        let result = generate_feed(&SidecarReader, dir.path(), &options(), reporter.clone()).unwrap();

        assert_eq!(result.item_count, 2);
        let events = reporter.events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::TagsUnavailable { file_name, .. } if file_name == "01.mp3"
        )));
    }

    #[test]
    fn directories_named_like_audio_files_are_skipped() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.mp3")).unwrap();
        std::fs::write(dir.path().join("real.mp3"), b"x").unwrap();

        let result =
            generate_feed(&SidecarReader, dir.path(), &options(), NoopReporter::shared()).unwrap();

        assert_eq!(result.item_count, 1);
        assert_eq!(result.skipped_files.len(), 1);
        assert_eq!(result.skipped_files[0].0, "folder.mp3");
        assert!(matches!(
            &result.skipped_files[0].1,
            EpisodeError::NotAFile(path) if path.ends_with("folder.mp3")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_skipped_with_io_error() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link.mp3")).unwrap();
        std::fs::write(dir.path().join("real.mp3"), b"x").unwrap();

        let result =
            generate_feed(&SidecarReader, dir.path(), &options(), NoopReporter::shared()).unwrap();

        assert_eq!(result.item_count, 1);
        assert!(matches!(
            &result.skipped_files[0].1,
            EpisodeError::MetadataFailed { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn all_files_skipped_is_reported_apart_from_none_found() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.mp3")).unwrap();

        let reporter = std::sync::Arc::new(RecordingReporter::default());
        let result = generate_feed(&SidecarReader, dir.path(), &options(), reporter.clone()).unwrap();

        assert_eq!(result.item_count, 0);
        let events = reporter.events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::NoEpisodesFound { skipped_files: 1, .. }
        )));
    }

    #[test]
    fn empty_directory_writes_empty_feed() {
        let dir = tempdir().unwrap();

        let reporter = std::sync::Arc::new(RecordingReporter::default());
        let result = generate_feed(&SidecarReader, dir.path(), &options(), reporter.clone()).unwrap();

        assert_eq!(result.item_count, 0);
        let xml = std::fs::read(&result.output_file).unwrap();
        let channel = rss::Channel::read_from(&xml[..]).unwrap();
        assert!(channel.items().is_empty());

        let events = reporter.events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            ProgressEvent::NoEpisodesFound { skipped_files: 0, .. }
        )));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let result = generate_feed(
            &SidecarReader,
            &dir.path().join("missing"),
            &options(),
            NoopReporter::shared(),
        );

        assert!(matches!(
            result,
            Err(GenerateError::Scan(ScanError::DirectoryNotFound(_)))
        ));
    }

    #[test]
    fn existing_feed_is_overwritten() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("feed.xml"), b"stale").unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();

        let result =
            generate_feed(&SidecarReader, dir.path(), &options(), NoopReporter::shared()).unwrap();

        let content = std::fs::read_to_string(result.output_file).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.contains("<rss"));
    }
}
