//! RSS 2.0 feed for the article listing.
//!
//! Items are ordered newest first. When an audio rendition of an article
//! exists at `<audio_dir>/<slug>.mp3`, the item gets an `<enclosure>` and the
//! iTunes tags podcast clients need.

use crate::config::FeedConfig;
use crate::errors::{Result, SyncError};
use crate::extractors::date::{parse_display_date, parse_iso_timestamp};
use crate::models::ArticleRecord;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use itertools::Itertools;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

struct FeedItem<'a> {
    record: &'a ArticleRecord,
    published: DateTime<FixedOffset>,
}

/// Best available publication time: the ISO timestamp, else the display
/// date at midnight UTC.
pub fn publication_time(record: &ArticleRecord) -> Option<DateTime<FixedOffset>> {
    record
        .published_at
        .as_deref()
        .and_then(parse_iso_timestamp)
        .or_else(|| {
            let date = record.display_date.as_deref().and_then(parse_display_date)?;
            let midnight = date.and_hms_opt(0, 0, 0)?;
            Some(Utc.from_utc_datetime(&midnight).fixed_offset())
        })
}

fn rfc822(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc).to_rfc2822()
}

struct SiteUrls {
    base: Url,
    prefix: String,
}

impl SiteUrls {
    fn new(feed: &FeedConfig) -> Result<Self> {
        let invalid = |source| SyncError::InvalidFeedUrl {
            url: feed.site_url.clone(),
            source,
        };
        let mut base = Url::parse(&feed.site_url).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(SiteUrls {
            base,
            prefix: feed.route_prefix.trim_matches('/').to_string(),
        })
    }

    fn join(&self, path: &str) -> Result<String> {
        self.base
            .join(path)
            .map(String::from)
            .map_err(|source| SyncError::InvalidFeedUrl {
                url: format!("{}{}", self.base, path),
                source,
            })
    }

    fn listing(&self) -> Result<String> {
        self.join(&self.prefix)
    }

    fn article(&self, slug: &str) -> Result<String> {
        self.join(&format!("{}/{}", self.prefix, slug))
    }

    fn audio(&self, slug: &str) -> Result<String> {
        self.join(&format!("audio/{}/{}.mp3", self.prefix, slug))
    }
}

fn text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty_element<W: Write>(w: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    w.write_event(Event::Empty(start))?;
    Ok(())
}

/// Render the feed document.
///
/// `audio_sizes` maps slugs to the byte length of their audio file; records
/// without an entry get no enclosure. Records with no resolvable date are
/// left out of the feed.
pub fn build_feed(
    records: &[ArticleRecord],
    feed: &FeedConfig,
    audio_sizes: &HashMap<String, u64>,
) -> Result<String> {
    let urls = SiteUrls::new(feed)?;
    let items: Vec<FeedItem<'_>> = records
        .iter()
        .filter_map(|record| match publication_time(record) {
            Some(published) => Some(FeedItem { record, published }),
            None => {
                warn!(slug = %record.slug, "No usable date; leaving article out of feed");
                None
            }
        })
        .sorted_by(|a, b| b.published.cmp(&a.published))
        .collect();

    let owner = format!("{} ({})", feed.email, feed.author);
    let listing = urls.listing()?;
    let self_link = format!("{}/rss.xml", listing.trim_end_matches('/'));

    let mut w = Writer::new_with_indent(Vec::new(), b'\t', 1);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    rss.push_attribute(("xmlns:content", "http://purl.org/rss/1.0/modules/content/"));
    rss.push_attribute(("xmlns:itunes", "http://www.itunes.com/dtds/podcast-1.0.dtd"));
    w.write_event(Event::Start(rss))?;
    w.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut w, "title", &feed.title)?;
    text_element(&mut w, "description", &feed.description)?;
    text_element(&mut w, "link", &listing)?;
    empty_element(
        &mut w,
        "atom:link",
        &[("href", self_link.as_str()), ("rel", "self"), ("type", "application/rss+xml")],
    )?;
    text_element(&mut w, "language", "en-us")?;
    if let Some(newest) = items.first() {
        text_element(&mut w, "lastBuildDate", &rfc822(&newest.published))?;
    }
    text_element(&mut w, "managingEditor", &owner)?;
    text_element(&mut w, "webMaster", &owner)?;
    text_element(&mut w, "itunes:author", &feed.author)?;
    text_element(&mut w, "itunes:summary", &feed.description)?;
    w.write_event(Event::Start(BytesStart::new("itunes:owner")))?;
    text_element(&mut w, "itunes:name", &feed.author)?;
    text_element(&mut w, "itunes:email", &feed.email)?;
    w.write_event(Event::End(BytesEnd::new("itunes:owner")))?;
    text_element(&mut w, "itunes:explicit", "no")?;
    empty_element(&mut w, "itunes:category", &[("text", feed.category.as_str())])?;
    if let Some(cover) = &feed.cover_image {
        empty_element(&mut w, "itunes:image", &[("href", cover.as_str())])?;
    }

    for item in &items {
        let record = item.record;
        let link = urls.article(&record.slug)?;
        w.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut w, "title", &record.title)?;
        text_element(&mut w, "link", &link)?;
        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        w.write_event(Event::Start(guid))?;
        w.write_event(Event::Text(BytesText::new(&link)))?;
        w.write_event(Event::End(BytesEnd::new("guid")))?;
        text_element(&mut w, "pubDate", &rfc822(&item.published))?;
        text_element(&mut w, "description", &record.title)?;
        for category in record.categories.iter().filter(|c| !c.trim().is_empty()) {
            text_element(&mut w, "category", category)?;
        }
        if let Some(length) = audio_sizes.get(&record.slug) {
            let audio_url = urls.audio(&record.slug)?;
            let length = length.to_string();
            empty_element(
                &mut w,
                "enclosure",
                &[("url", audio_url.as_str()), ("type", "audio/mpeg"), ("length", length.as_str())],
            )?;
            text_element(&mut w, "itunes:author", &feed.author)?;
            text_element(&mut w, "itunes:summary", &record.title)?;
            text_element(&mut w, "itunes:explicit", "no")?;
        }
        w.write_event(Event::End(BytesEnd::new("item")))?;
    }

    w.write_event(Event::End(BytesEnd::new("channel")))?;
    w.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8_lossy(&w.into_inner()).into_owned();
    xml.push('\n');
    Ok(xml)
}

async fn audio_sizes(records: &[ArticleRecord], audio_dir: Option<&Path>) -> HashMap<String, u64> {
    let mut sizes = HashMap::new();
    let Some(dir) = audio_dir else {
        return sizes;
    };
    for record in records {
        let path = dir.join(format!("{}.mp3", record.slug));
        if let Ok(meta) = fs::metadata(&path).await {
            if meta.is_file() {
                sizes.insert(record.slug.clone(), meta.len());
            }
        }
    }
    sizes
}

#[instrument(level = "info", skip_all, fields(path = %feed.output_path.display()))]
pub async fn write_feed(records: &[ArticleRecord], feed: &FeedConfig) -> Result<PathBuf> {
    let sizes = audio_sizes(records, feed.audio_dir.as_deref()).await;
    let xml = build_feed(records, feed, &sizes)?;

    let path = feed.output_path.clone();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::io(parent, e))?;
    }
    fs::write(&path, xml)
        .await
        .map_err(|e| SyncError::io(&path, e))?;
    info!(items = records.len(), with_audio = sizes.len(), "Wrote RSS feed");
    Ok(path)
}
