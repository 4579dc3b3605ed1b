//! RSS feed reading.
//!
//! Only the fields the pipeline uses are read from each `<item>`: `title`,
//! `link`, `pubDate` and the `url` of `<enclosure>`. Items are returned in
//! feed order.

use crate::models::FeedEntry;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use std::error::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    PubDate,
}

#[derive(Debug, Default)]
struct RawItem {
    title: String,
    link: String,
    pub_date: String,
    enclosure: Option<String>,
}

impl RawItem {
    fn set(&mut self, field: Field, value: &str) {
        let value = value.trim().to_string();
        match field {
            Field::Title => self.title = value,
            Field::Link => self.link = value,
            Field::PubDate => self.pub_date = value,
        }
    }

    fn into_entry(self) -> FeedEntry {
        FeedEntry {
            published_at: parse_pub_date(&self.pub_date),
            title: self.title,
            link: self.link,
            enclosure: self.enclosure,
        }
    }
}

/// Parse an RFC 2822 `pubDate`. Missing or malformed dates map to the Unix
/// epoch, which tells the assembler to read the date from the page.
pub fn parse_pub_date(raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(date) => date.with_timezone(&Utc),
        Err(e) => {
            if !raw.trim().is_empty() {
                debug!(pub_date = raw, error = %e, "Unparsable pubDate");
            }
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

/// Read up to `max_count` entries from an RSS 2.0 document.
pub fn read_feed(xml: &str, max_count: usize) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    if max_count == 0 {
        return Ok(entries);
    }

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" => current = Some(RawItem::default()),
                b"title" if current.is_some() => begin_field(&mut field, &mut text, Field::Title),
                b"link" if current.is_some() => begin_field(&mut field, &mut text, Field::Link),
                b"pubDate" if current.is_some() => {
                    begin_field(&mut field, &mut text, Field::PubDate)
                }
                b"enclosure" => {
                    if let Some(item) = current.as_mut() {
                        item.enclosure = enclosure_url(&reader, &e)?;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"enclosure" {
                    if let Some(item) = current.as_mut() {
                        item.enclosure = enclosure_url(&reader, &e)?;
                    }
                }
            }
            Event::Text(t) if field.is_some() => text.push_str(&t.decode()?),
            Event::CData(c) if field.is_some() => text.push_str(&c.decode()?),
            Event::GeneralRef(r) if field.is_some() => {
                if let Some(ch) = r.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = r.decode()?;
                    match resolve_predefined_entity(&name) {
                        Some(resolved) => text.push_str(resolved),
                        None => {
                            text.push('&');
                            text.push_str(&name);
                            text.push(';');
                        }
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        let entry = item.into_entry();
                        trace!(title = %entry.title, link = %entry.link, "Read feed entry");
                        entries.push(entry);
                        if entries.len() >= max_count {
                            break;
                        }
                    }
                }
                b"title" | b"link" | b"pubDate" => {
                    if let (Some(item), Some(f)) = (current.as_mut(), field.take()) {
                        item.set(f, &text);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn begin_field(field: &mut Option<Field>, text: &mut String, which: Field) {
    *field = Some(which);
    text.clear();
}

fn enclosure_url(
    reader: &Reader<&[u8]>,
    element: &quick_xml::events::BytesStart<'_>,
) -> Result<Option<String>, Box<dyn Error>> {
    match element.try_get_attribute("url")? {
        Some(attr) => {
            let url = attr.decode_and_unescape_value(reader.decoder())?;
            let url = url.trim();
            Ok((!url.is_empty()).then(|| url.to_string()))
        }
        None => Ok(None),
    }
}
