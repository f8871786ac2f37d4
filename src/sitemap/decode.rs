//! Sitemap XML decoder
//!
//! Reads `<url>` records out of a sitemap `<urlset>` with a streaming event
//! reader. Namespace prefixes are ignored and decoding stops quietly at the
//! first XML error, returning the records completed so far.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// One `<url>` record of a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// `<loc>`: the page URL
    pub location: String,

    /// `<lastmod>`: W3C datetime of the last modification, as written
    pub last_modified: Option<String>,

    /// `<changefreq>`: how often the page is expected to change
    pub change_frequency: Option<String>,
}

impl SitemapEntry {
    /// Parses `last_modified` as a full RFC 3339 datetime or a bare `YYYY-MM-DD` date
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_modified.as_deref()?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }
}

/// Entry being built from XML events
#[derive(Debug, Default)]
struct PartialEntry {
    location: Option<String>,
    last_modified: Option<String>,
    change_frequency: Option<String>,
}

impl PartialEntry {
    fn finish(self) -> Option<SitemapEntry> {
        let location = self.location.filter(|loc| !loc.is_empty())?;
        Some(SitemapEntry {
            location,
            last_modified: self.last_modified,
            change_frequency: self.change_frequency,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Location,
    LastModified,
    ChangeFrequency,
}

/// Decodes a sitemap document into its `<url>` entries
///
/// Records without a non-empty `<loc>` are dropped. Malformed input yields a
/// partial (possibly empty) sequence rather than an error.
///
/// # Example
///
/// ```
/// use sumi_sweep::sitemap::decode_sitemap;
///
/// let xml = br#"<urlset><url><loc>https://example.com/</loc></url></urlset>"#;
/// let entries = decode_sitemap(xml);
/// assert_eq!(entries[0].location, "https://example.com/");
/// ```
pub fn decode_sitemap(xml: &[u8]) -> Vec<SitemapEntry> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::with_capacity(1024);
    let mut text_buf = String::new();

    let mut entries = Vec::new();
    let mut current: Option<PartialEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"url" => {
                    current = Some(PartialEntry::default());
                    field = None;
                }
                b"loc" if current.is_some() => {
                    field = Some(Field::Location);
                    text_buf.clear();
                }
                b"lastmod" if current.is_some() => {
                    field = Some(Field::LastModified);
                    text_buf.clear();
                }
                b"changefreq" if current.is_some() => {
                    field = Some(Field::ChangeFrequency);
                    text_buf.clear();
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if field.is_some() {
                    if let Ok(text) = e.unescape() {
                        text_buf.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if field.is_some() {
                    text_buf.push_str(&String::from_utf8_lossy(&e.to_vec()));
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.local_name();
                if name.as_ref() == b"url" {
                    if let Some(entry) = current.take().and_then(PartialEntry::finish) {
                        entries.push(entry);
                    }
                    field = None;
                } else if let (Some(which), Some(entry)) = (field.take(), current.as_mut()) {
                    let value = text_buf.trim().to_string();
                    match which {
                        Field::Location => entry.location = Some(value),
                        Field::LastModified => entry.last_modified = Some(value),
                        Field::ChangeFrequency => entry.change_frequency = Some(value),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    "Site map decoding stopped at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    entries
}
