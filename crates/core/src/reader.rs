use std::collections::BTreeMap;
use std::sync::Mutex;

use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::model::LanguageData;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid mapping xml: {0}")]
    Xml(String),
}

/// Turns a raw mapping body into [`LanguageData`].
pub trait Reader: Send + Sync {
    fn parse_input(&self, bytes: &[u8]) -> Result<LanguageData, ParseError>;

    /// Release whatever the reader kept around from the last parse.
    fn close(&self);
}

enum Section {
    None,
    String { name: String, text: String },
    Array { name: String, items: Vec<String> },
    Plurals { name: String, items: BTreeMap<String, String> },
}

/// Reader for Android `<resources>` XML.
#[derive(Default)]
pub struct XmlReader {
    buf: Mutex<Vec<u8>>,
}

impl XmlReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently held by the scratch buffer.
    pub fn retained_capacity(&self) -> usize {
        self.buf.lock().map(|b| b.capacity()).unwrap_or(0)
    }
}

fn xml_err(e: impl std::fmt::Display) -> ParseError {
    ParseError::Xml(e.to_string())
}

fn attr(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ParseError> {
    match e.try_get_attribute(key).map_err(xml_err)? {
        Some(a) => Ok(Some(a.unescape_value().map_err(xml_err)?.into_owned())),
        None => Ok(None),
    }
}

/// Collapse whitespace runs to one space and trim, the way aapt treats
/// unquoted values, then undo backslash escapes.
fn normalize_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    unescape_android(&collapsed)
}

/// Undo the backslash escapes aapt applies to string values.
fn unescape_android(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other @ ('\'' | '"' | '\\' | '@' | '?')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl Reader for XmlReader {
    fn parse_input(&self, bytes: &[u8]) -> Result<LanguageData, ParseError> {
        let mut guard = self.buf.lock().map_err(|_| ParseError::Xml("reader poisoned".into()))?;
        let buf: &mut Vec<u8> = &mut guard;
        buf.clear();

        let mut xml = quick_xml::Reader::from_reader(bytes);

        let mut data = LanguageData::default();
        let mut section = Section::None;
        // quantity of the open plural item, or Some("") for an open array item
        let mut item: Option<(String, String)> = None;

        loop {
            match xml.read_event_into(buf).map_err(xml_err)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"string" => {
                        if let Some(name) = attr(&e, "name")? {
                            section = Section::String { name, text: String::new() };
                        }
                    }
                    b"string-array" => {
                        if let Some(name) = attr(&e, "name")? {
                            section = Section::Array { name, items: Vec::new() };
                        }
                    }
                    b"plurals" => {
                        if let Some(name) = attr(&e, "name")? {
                            section = Section::Plurals { name, items: BTreeMap::new() };
                        }
                    }
                    b"item" => {
                        let quantity = attr(&e, "quantity")?.unwrap_or_default();
                        item = Some((quantity, String::new()));
                    }
                    // inline markup such as <b> or <xliff:g>; its text joins the value
                    _ => {}
                },
                Event::Empty(e) => {
                    if e.name().as_ref() == b"string" {
                        if let Some(name) = attr(&e, "name")? {
                            data.resources.insert(name, String::new());
                        }
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml_err)?;
                    push_text(&mut section, &mut item, &text);
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    push_text(&mut section, &mut item, &text);
                }
                Event::End(e) => match e.name().as_ref() {
                    b"item" => {
                        if let Some((quantity, text)) = item.take() {
                            match &mut section {
                                Section::Array { items, .. } => items.push(normalize_value(&text)),
                                Section::Plurals { items, .. } if !quantity.is_empty() => {
                                    items.insert(quantity, normalize_value(&text));
                                }
                                _ => {}
                            }
                        }
                    }
                    b"string" | b"string-array" | b"plurals" => {
                        match std::mem::replace(&mut section, Section::None) {
                            Section::String { name, text } => {
                                data.resources.insert(name, normalize_value(&text));
                            }
                            Section::Array { name, items } => {
                                data.arrays.insert(name, items);
                            }
                            Section::Plurals { name, items } => {
                                data.plurals.insert(name, items);
                            }
                            Section::None => {}
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(data)
    }

    fn close(&self) {
        if let Ok(mut buf) = self.buf.lock() {
            *buf = Vec::new();
        }
    }
}

fn push_text(section: &mut Section, item: &mut Option<(String, String)>, text: &str) {
    if let Some((_, current)) = item.as_mut() {
        current.push_str(text);
        return;
    }
    if let Section::String { text: current, .. } = section {
        current.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_value, unescape_android};

    #[test]
    fn unescapes_common_sequences() {
        assert_eq!(unescape_android(r"Don\'t"), "Don't");
        assert_eq!(unescape_android(r"a\nb"), "a\nb");
        assert_eq!(unescape_android(r"\@id"), "@id");
        assert_eq!(unescape_android(r"keep\x"), r"keep\x");
        assert_eq!(unescape_android("trailing\\"), "trailing\\");
    }

    #[test]
    fn collapses_whitespace_before_unescaping() {
        assert_eq!(normalize_value("\n   Hello \n\t  world  "), "Hello world");
        assert_eq!(normalize_value(r"line\nbreak"), "line\nbreak");
    }
}
