mod build;
mod serialize;

pub use build::{
    Enclosure, EpisodeFile, FeedChannel, FeedDocument, FeedItem, ITEM_CATEGORY, ItunesChannel,
    PubDateMode, audio_url, build_feed, sequential_pub_date,
};
pub use serialize::{serialize_feed, to_rss_channel};
