//! Fetching and parsing of the arXiv Atom feed.

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use url::Url;

use crate::{
    error::{DigestError, Result},
    record::{PaperRecord, ResultKind},
};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; arxiv-digest/0.1; +https://arxiv.org)";

/// Build the HTTP agent shared by all feed requests of one run.
///
/// With no timeout the agent waits indefinitely on each request.
pub fn agent(timeout: Option<Duration>) -> ureq::Agent {
    let cfg = ureq::Agent::config_builder()
        .timeout_connect(timeout)
        .timeout_global(timeout)
        .build();
    ureq::Agent::new_with_config(cfg)
}

/// Issue one search request and parse the response into records.
pub fn fetch(agent: &ureq::Agent, url: &Url, kind: ResultKind) -> Result<Vec<PaperRecord>> {
    let body: String = agent
        .get(url.as_str())
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| DigestError::fetch(kind, e))?
        .into_body()
        .read_to_string()
        .map_err(|e| DigestError::fetch(kind, e))?;
    parse_feed(&body, kind)
}

/// Parse an Atom feed payload into one record per entry.
///
/// A well-formed feed with zero entries yields an empty vector. A payload
/// without a feed element, or one that fails to parse, is a fetch failure.
pub fn parse_feed(xml: &str, kind: ResultKind) -> Result<Vec<PaperRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut saw_feed = false;
    let mut in_entry = false;
    let mut in_author = false;
    let mut cur_text = String::new();

    // Accumulators for the entry currently being read.
    let mut title = String::new();
    let mut summary = String::new();
    let mut id = String::new();
    let mut published = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut categories: Vec<String> = Vec::new();

    fn is_local(name: &[u8], target: &str) -> bool {
        // Compare local name ignoring namespace prefixes.
        if let Some(pos) = name.iter().rposition(|&b| b == b':') {
            &name[pos + 1..] == target.as_bytes()
        } else {
            name == target.as_bytes()
        }
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if is_local(e.name().as_ref(), "feed") {
                    saw_feed = true;
                } else if is_local(e.name().as_ref(), "entry") {
                    in_entry = true;
                    title.clear();
                    summary.clear();
                    id.clear();
                    published.clear();
                    authors.clear();
                    categories.clear();
                } else if in_entry && is_local(e.name().as_ref(), "author") {
                    in_author = true;
                } else if in_entry && is_local(e.name().as_ref(), "category") {
                    if let Some(term) = get_attr_value(&e, b"term") {
                        categories.push(term);
                    }
                }
                cur_text.clear();
            }
            Ok(Event::End(e)) => {
                if is_local(e.name().as_ref(), "entry") {
                    in_entry = false;
                    records.push(PaperRecord {
                        title: normalize_ws(&title),
                        authors: authors.join(", "),
                        summary: std::mem::take(&mut summary),
                        categories: categories.join(", "),
                        url: std::mem::take(&mut id),
                        published: std::mem::take(&mut published),
                    });
                } else if is_local(e.name().as_ref(), "author") {
                    in_author = false;
                } else if in_entry && in_author && is_local(e.name().as_ref(), "name") {
                    let name = cur_text.trim();
                    if !name.is_empty() {
                        authors.push(name.to_string());
                    }
                } else if in_entry && is_local(e.name().as_ref(), "title") {
                    title = cur_text.clone();
                } else if in_entry && is_local(e.name().as_ref(), "summary") {
                    summary = cur_text.trim().to_string();
                } else if in_entry && is_local(e.name().as_ref(), "id") {
                    id = cur_text.trim().to_string();
                } else if in_entry && is_local(e.name().as_ref(), "published") {
                    published = cur_text.trim().to_string();
                }
                cur_text.clear();
            }
            Ok(Event::Text(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::CData(t)) => {
                cur_text.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::Empty(e)) => {
                if in_entry && is_local(e.name().as_ref(), "category") {
                    if let Some(term) = get_attr_value(&e, b"term") {
                        categories.push(term);
                    }
                }
            }
            Err(e) => return Err(DigestError::fetch(kind, format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_feed {
        return Err(DigestError::fetch(kind, "response is not an Atom feed"));
    }
    Ok(records)
}

fn get_attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .map(|a| String::from_utf8_lossy(a.value.as_ref()).to_string())
}

/// Collapse runs of whitespace to single spaces. Feed titles arrive with
/// hard wraps that would otherwise defeat substring matching.
fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
