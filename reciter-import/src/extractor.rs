//! AudioObject extraction from archive.org item pages
//!
//! archive.org embeds one schema.org `AudioObject` block per file:
//!
//! ```text
//! <div itemprop="hasPart" itemscope itemtype="http://schema.org/AudioObject">
//!   <meta itemprop="name" content="001 Al-Fatiha">
//!   <meta itemprop="duration" content="PT0M49S">
//!   <link itemprop="associatedMedia" href="https://archive.org/download/item/001.mp3">
//! </div>
//! ```
//!
//! The page is scanned tag by tag; text content is never needed. Scanning is
//! case-insensitive for tag and attribute names and tolerant of unquoted
//! attribute values, comments and script/style bodies.

use tracing::trace;

/// One audio file found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioRecord {
    pub name: Option<String>,
    pub duration: Option<String>,
    pub url: String,
}

/// Fields collected while inside an AudioObject block
#[derive(Debug, Default)]
struct PendingRecord {
    name: Option<String>,
    duration: Option<String>,
    url: Option<String>,
}

impl PendingRecord {
    fn finish(self) -> Option<AudioRecord> {
        let url = self.url?;
        Some(AudioRecord {
            name: self.name,
            duration: self.duration,
            url,
        })
    }
}

#[derive(Debug)]
enum State {
    Outside,
    InAudioObject(PendingRecord),
}

/// Extract audio records from page markup, in document order.
///
/// Blocks without an accepted MP3 link are dropped. Empty or unparseable
/// input yields an empty vector.
pub fn extract_audio_records(html: &str) -> Vec<AudioRecord> {
    let mut records = Vec::new();
    let mut state = State::Outside;

    for tag in Tokenizer::new(html) {
        match tag {
            Tag::Start { name, attrs } => {
                if name == "div" && attr(&attrs, "itemtype").is_some_and(|t| t.contains("AudioObject")) {
                    state = State::InAudioObject(PendingRecord::default());
                }
                if let State::InAudioObject(pending) = &mut state {
                    collect_property(pending, &name, &attrs);
                }
            }
            Tag::End { name } => {
                if name == "div" {
                    if let State::InAudioObject(pending) = std::mem::replace(&mut state, State::Outside) {
                        if let Some(record) = pending.finish() {
                            trace!(url = %record.url, "AudioObject");
                            records.push(record);
                        }
                    }
                }
            }
        }
    }

    records
}

fn collect_property(pending: &mut PendingRecord, tag: &str, attrs: &[(String, String)]) {
    let itemprop = attr(attrs, "itemprop").unwrap_or_default();
    match tag {
        "meta" => {
            let content = attr(attrs, "content").unwrap_or_default();
            match itemprop {
                "name" => pending.name = Some(content.to_string()),
                "duration" => pending.duration = Some(content.to_string()),
                _ => {}
            }
        }
        "link" if itemprop == "associatedMedia" => {
            let href = attr(attrs, "href").unwrap_or_default();
            if is_primary_mp3(href) {
                pending.url = Some(href.to_string());
            }
        }
        _ => {}
    }
}

/// MP3 links only; `_vbr.mp3` files are re-encoded duplicates
fn is_primary_mp3(href: &str) -> bool {
    href.ends_with(".mp3") && !href.contains("_vbr.mp3")
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// A start (or self-closing) tag or an end tag; names are lowercase
#[derive(Debug, PartialEq)]
enum Tag {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
}

/// Minimal tag scanner over raw markup
struct Tokenizer<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(html: &'a str) -> Self {
        Self { html, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.html[self.pos..]
    }

    /// Advance past the next occurrence of `needle`, or to the end
    fn skip_past(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(i) => self.pos += i + needle.len(),
            None => self.pos = self.html.len(),
        }
    }

    /// Skip a raw-text element body up to and including its end tag
    fn skip_raw_text(&mut self, tag: &str) {
        let closing = format!("</{}", tag);
        let lower = self.rest().to_ascii_lowercase();
        match lower.find(&closing) {
            Some(i) => {
                self.pos += i;
                self.skip_past(">");
            }
            None => self.pos = self.html.len(),
        }
    }

    fn read_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos += rest.len() - trimmed.len();
    }

    /// Parse attributes up to and including the closing `>`
    fn read_attrs(&mut self) -> Vec<(String, String)> {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return attrs;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return attrs;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let end = rest
                .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(rest.len());
            if end == 0 {
                // Stray '=' or similar; step over it
                self.pos += 1;
                continue;
            }
            let key = rest[..end].to_ascii_lowercase();
            self.pos += end;

            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()
            } else {
                String::new()
            };
            attrs.push((key, value));
        }
    }

    fn read_attr_value(&mut self) -> String {
        let rest = self.rest();
        let raw = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body.find(quote).unwrap_or(body.len());
                self.pos += 1 + end + usize::from(end < body.len());
                &body[..end]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        decode_entities(raw)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        loop {
            let start = self.rest().find('<')?;
            self.pos += start;
            let rest = self.rest();

            if rest.starts_with("<!--") {
                self.skip_past("-->");
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">");
                continue;
            }
            if let Some(after) = rest.strip_prefix("</") {
                if after.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    self.pos += 2;
                    let name = self.read_name();
                    self.skip_past(">");
                    return Some(Tag::End { name });
                }
                self.pos += 2;
                continue;
            }
            if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.pos += 1;
                let name = self.read_name();
                let attrs = self.read_attrs();
                if name == "script" || name == "style" {
                    self.skip_raw_text(&name);
                }
                return Some(Tag::Start { name, attrs });
            }

            // Bare '<' in text
            self.pos += 1;
        }
    }
}

/// Decode character references in an attribute value, named HTML5
/// entities included
fn decode_entities(raw: &str) -> String {
    htmlize::unescape(raw).into_owned()
}
