// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rss::extension::itunes::{ITunesCategory, ITunesChannelExtension, ITunesOwner};
use rss::{Category, Channel, Guid, Item};

use crate::error::SerializeError;

use super::build::{FeedChannel, FeedDocument, FeedItem};

/// Indentation used by pretty output
const PRETTY_INDENT: usize = 2;

/// Render a feed document as UTF-8 XML
///
/// Pretty output differs from the compact form only in the whitespace
/// between elements.
pub fn serialize_feed(document: &FeedDocument, pretty: bool) -> Result<Vec<u8>, SerializeError> {
    let channel = to_rss_channel(document);

    let bytes = if pretty {
        channel.pretty_write_to(Vec::new(), b' ', PRETTY_INDENT)?
    } else {
        channel.write_to(Vec::new())?
    };

    Ok(bytes)
}

/// Convert a feed document into an `rss` channel ready for writing
pub fn to_rss_channel(document: &FeedDocument) -> Channel {
    let header = &document.channel;

    let mut channel = Channel::default();
    channel.set_title(header.title.as_str());
    channel.set_description(header.description.as_str());
    channel.set_link(header.link.as_str());
    channel.set_language(header.language.clone());
    channel.set_webmaster(header.web_master.clone());
    channel.set_docs(header.docs.clone());
    channel.set_pub_date(header.pub_date.clone());
    channel.set_itunes_ext(itunes_extension(header));
    channel.set_items(document.items.iter().map(to_rss_item).collect::<Vec<_>>());
    channel
}

fn itunes_extension(header: &FeedChannel) -> ITunesChannelExtension {
    let itunes = &header.itunes;

    let mut category = ITunesCategory::default();
    category.set_text(itunes.category.as_str());

    let mut owner = ITunesOwner::default();
    owner.set_email(itunes.owner_email.clone());
    owner.set_name(itunes.owner_name.clone());

    let mut ext = ITunesChannelExtension::default();
    ext.set_author(itunes.author.clone());
    ext.set_subtitle(itunes.subtitle.clone());
    ext.set_summary(itunes.summary.clone());
    ext.set_explicit(itunes.explicit.clone());
    ext.set_image(itunes.image.clone());
    ext.set_categories(vec![category]);
    ext.set_owner(owner);
    ext
}

fn to_rss_item(item: &FeedItem) -> Item {
    let mut guid = Guid::default();
    guid.set_value(item.guid.as_str());

    let mut enclosure = rss::Enclosure::default();
    enclosure.set_url(item.enclosure.url.as_str());
    enclosure.set_length(item.enclosure.length.to_string());
    enclosure.set_mime_type(item.enclosure.mime_type.as_str());

    let mut category = Category::default();
    category.set_name(item.category.as_str());

    let mut rss_item = Item::default();
    rss_item.set_title(item.title.clone());
    rss_item.set_guid(guid);
    rss_item.set_description(item.description.clone());
    rss_item.set_enclosure(enclosure);
    rss_item.set_categories(vec![category]);
    rss_item.set_pub_date(item.pub_date.clone());
    rss_item
}
