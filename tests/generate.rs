use std::path::Path;

use lofty::config::WriteOptions;
use lofty::id3::v2::Id3v2Tag;
use lofty::prelude::*;
use podgen::{GenerateOptions, Id3Reader, NoopReporter, PubDateMode, generate_feed};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// MPEG-1 Layer III, 128 kbit/s, 44.1 kHz, no padding
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
const FRAME_LENGTH: usize = 417;

fn options() -> GenerateOptions {
    GenerateOptions {
        host: Some("baz.com".to_string()),
        user: Some("joe".to_string()),
        ..Default::default()
    }
}

/// Write an ID3v2 tag with equal comment and description, then `audio`
fn write_tagged_file(path: &Path, audio: &[u8]) {
    let mut tag = Id3v2Tag::new();
    tag.set_title("Real Title".to_string());
    tag.set_artist("Ann".to_string());
    tag.insert_user_text("DESCRIPTION".to_string(), "Same".to_string());
    tag.insert_user_text("COMMENT".to_string(), "Same".to_string());

    let mut bytes = Vec::new();
    tag.dump_to(&mut bytes, WriteOptions::default()).unwrap();
    bytes.extend_from_slice(audio);
    std::fs::write(path, bytes).unwrap();
}

fn mpeg_frames(count: usize) -> Vec<u8> {
    let mut frame = FRAME_HEADER.to_vec();
    frame.resize(FRAME_LENGTH, 0);
    frame.repeat(count)
}

fn read_channel(path: &Path) -> rss::Channel {
    let xml = std::fs::read(path).unwrap();
    rss::Channel::read_from(&xml[..]).unwrap()
}

#[test]
fn public_html_directory_gets_user_url() {
    let home = tempdir().unwrap();
    let input_dir = home.path().join("public_html").join("bar");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::write(input_dir.join("01 Intro.mp3"), b"not really audio").unwrap();

    let result = generate_feed(&Id3Reader, &input_dir, &options(), NoopReporter::shared()).unwrap();

    assert_eq!(result.feed_url, "http://baz.com/~joe/bar/feed.xml");
    assert_eq!(result.output_file, input_dir.join("feed.xml"));

    let channel = read_channel(&result.output_file);
    assert_eq!(channel.title(), "Bar");
    assert_eq!(channel.items().len(), 1);

    let item = &channel.items()[0];
    assert_eq!(item.title(), Some("01 Intro.mp3"));
    assert_eq!(item.description(), Some("(file name: 01 Intro.mp3)"));
    assert_eq!(
        item.enclosure().map(|e| e.url()),
        Some("http://baz.com/~joe/bar/01%20Intro.mp3")
    );
    assert_eq!(item.enclosure().map(|e| e.length()), Some("16"));
    assert_eq!(
        item.guid().map(|g| g.value()),
        Some("http://baz.com/~joe/bar/01%20Intro.mp3")
    );
}

#[test]
fn items_follow_file_name_order() {
    let dir = tempdir().unwrap();
    for name in ["b.mp3", "10.mp3", "B.mp3", "2.mp3", "a.MP3", "cover.jpg"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }

    let result = generate_feed(&Id3Reader, dir.path(), &options(), NoopReporter::shared()).unwrap();

    let channel = read_channel(&result.output_file);
    let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
    assert_eq!(titles, vec!["10.mp3", "2.mp3", "B.mp3", "a.MP3", "b.mp3"]);
}

#[test]
fn sequential_dates_and_overrides() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    std::fs::write(dir.path().join("b.mp3"), b"x").unwrap();

    let options = GenerateOptions {
        title: Some("My Show".to_string()),
        base_url: Some("https://cdn.example.com/show".to_string()),
        pretty: true,
        pub_dates: PubDateMode::Sequential,
        ..options()
    };

    let result = generate_feed(&Id3Reader, dir.path(), &options, NoopReporter::shared()).unwrap();

    assert_eq!(result.feed_url, "https://cdn.example.com/show/feed.xml");

    let channel = read_channel(&result.output_file);
    assert_eq!(channel.title(), "My Show");
    let dates: Vec<_> = channel.items().iter().filter_map(|i| i.pub_date()).collect();
    assert_eq!(
        dates,
        vec![
            "Sat, 01 Jan 2000 00:00:00 +0000",
            "Sun, 02 Jan 2000 00:00:00 +0000"
        ]
    );
    assert_eq!(
        channel.items()[1].enclosure().map(|e| e.url()),
        Some("https://cdn.example.com/show/b.mp3")
    );
}

#[test]
fn empty_directory_produces_valid_feed() {
    let dir = tempdir().unwrap();

    let result = generate_feed(&Id3Reader, dir.path(), &options(), NoopReporter::shared()).unwrap();

    assert_eq!(result.item_count, 0);
    let channel = read_channel(&result.output_file);
    assert!(channel.items().is_empty());
    assert!(channel.itunes_ext().is_some());
}

#[test]
fn embedded_tags_describe_the_item() {
    let dir = tempdir().unwrap();
    write_tagged_file(&dir.path().join("a.mp3"), &mpeg_frames(10));

    let result = generate_feed(&Id3Reader, dir.path(), &options(), NoopReporter::shared()).unwrap();

    let channel = read_channel(&result.output_file);
    let item = &channel.items()[0];
    assert_eq!(item.title(), Some("Real Title"));
    assert_eq!(
        item.description(),
        Some("Same\n(by Ann)\n(file name: a.mp3)")
    );

    let xml = std::fs::read_to_string(&result.output_file).unwrap();
    assert_eq!(xml.matches("Same").count(), 1);
}

#[test]
fn tags_are_read_from_files_without_audio_frames() {
    let dir = tempdir().unwrap();
    write_tagged_file(&dir.path().join("a.mp3"), b"");
    write_tagged_file(&dir.path().join("b.mp3"), b"not really audio");

    let result = generate_feed(&Id3Reader, dir.path(), &options(), NoopReporter::shared()).unwrap();

    let channel = read_channel(&result.output_file);
    for item in channel.items() {
        assert_eq!(item.title(), Some("Real Title"));
        assert!(item.description().unwrap().contains("(by Ann)"));
    }
    assert_eq!(channel.items().len(), 2);
}
