//! Front-matter parsing and serialization
//!
//! The metadata block is deliberately small: flat `key: value` lines plus
//! bracketed string lists, delimited by standalone `---` lines. Anything the
//! parser does not understand is skipped or treated as body text; parsing
//! never fails.

use indexmap::IndexMap;

/// Line opening and closing the metadata block
const DELIMITER: &str = "---";

/// A front-matter value: a flat string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The flat string, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    /// The items, if this is a list value
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

/// Metadata block preceding an article body.
///
/// Keys keep their insertion order so a parse/serialize round trip does not
/// reshuffle the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, FieldValue>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Flat string value for `key`, if present and text-typed
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FieldValue::as_text)
    }

    /// List value for `key`, if present and list-typed
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.fields.get(key).and_then(FieldValue::as_list)
    }

    /// Insert or overwrite a field, keeping its original position when the
    /// key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}

/// Split a raw content file into front matter and body.
///
/// The front matter is the block between an opening `---` line and the next
/// `---` line. When the opening line is absent, or the block is never
/// terminated, the whole (trimmed) input is the body and the front matter is
/// empty.
pub fn parse(raw: &str) -> (FrontMatter, String) {
    let raw = raw.trim();
    let lines: Vec<&str> = raw.lines().collect();

    if lines.first().map(|l| l.trim()) != Some(DELIMITER) {
        return (FrontMatter::default(), raw.to_string());
    }

    let end = lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == DELIMITER)
        .map(|i| i + 1);

    match end {
        Some(end) => {
            let front_matter = parse_fields(&lines[1..end]);
            let body = lines[end + 1..].join("\n").trim().to_string();
            (front_matter, body)
        }
        // Unterminated block: the whole file is body
        None => (FrontMatter::default(), raw.to_string()),
    }
}

/// Parse the lines between the delimiters. Lines without a colon are skipped
/// without error.
fn parse_fields(lines: &[&str]) -> FrontMatter {
    let mut front_matter = FrontMatter::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        front_matter.set(key, parse_value(value.trim()));
    }

    front_matter
}

/// A value wrapped in `[` ... `]` is a comma-separated list; everything else
/// stays a flat string.
fn parse_value(value: &str) -> FieldValue {
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        FieldValue::List(items)
    } else {
        FieldValue::Text(value.to_string())
    }
}

/// Render front matter and body back into file form.
///
/// List values are written in bracket syntax, so everything `parse` reads
/// survives a save round trip. Empty front matter writes no block at all.
pub fn serialize(front_matter: &FrontMatter, body: &str) -> String {
    if front_matter.is_empty() {
        return body.to_string();
    }

    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in front_matter.iter() {
        match value {
            FieldValue::Text(text) => out.push_str(&format!("{}: {}\n", key, text)),
            FieldValue::List(items) => {
                out.push_str(&format!("{}: [{}]\n", key, items.join(", ")))
            }
        }
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    out
}
