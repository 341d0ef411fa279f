//! `{key}` placeholder templating
//!
//! Used for file/folder names, captions and tag values. `{{` and `}}` produce
//! literal braces. Unknown keys are left as `{key}` unless a replacement text
//! is given.

use serde_json::{Map, Value};

/// Format ids that denote lossless streams
const LOSSLESS_FORMAT_IDS: [i64; 3] = [6, 7, 27];

/// Render `template` against a JSON object
///
/// `missing` replaces unknown placeholders; any `{key}` inside it is
/// substituted with the name of the missing key.
pub fn render(template: &str, data: &Map<String, Value>, missing: Option<&str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }

                if !closed {
                    out.push('{');
                    out.push_str(&key);
                    continue;
                }

                match data.get(&key) {
                    Some(value) => out.push_str(&display_value(value)),
                    None => out.push_str(&missing_text(&key, missing)),
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn missing_text(key: &str, missing: Option<&str>) -> String {
    match missing {
        Some(text) => text.replace("{key}", key),
        None => format!("{{{}}}", key),
    }
}

/// Name of an `{"name": ...}` object, or the value itself when it is a plain string
fn name_of(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => map.get("name").cloned(),
        Value::String(_) => Some(value.clone()),
        _ => None,
    }
}

/// Template input with derived convenience keys
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    values: Map<String, Value>,
}

impl TemplateData {
    /// Build from a JSON value, deriving the aliases used by name templates
    ///
    /// Non-object values produce empty data.
    pub fn from_value(value: &Value) -> Self {
        let source = match value {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        let mut values = source.clone();

        if let Some(artist) = source
            .get("performer")
            .and_then(name_of)
            .or_else(|| source.get("artist").and_then(name_of))
        {
            values.insert("artist".into(), artist);
        }

        if let Some(title) = source.get("title") {
            values.insert("name".into(), title.clone());
        }

        if let Some(format_id) = source.get("format_id") {
            let lossless = format_id
                .as_i64()
                .or_else(|| format_id.as_str().and_then(|s| s.parse().ok()))
                .is_some_and(|id| LOSSLESS_FORMAT_IDS.contains(&id));
            let format = if lossless { "flac" } else { "mp3" };
            values.insert("format".into(), Value::from(format));
        }

        if let Some(Value::Object(album)) = source.get("album") {
            if let Some(title) = album.get("title") {
                values.insert("album_title".into(), title.clone());
                values.insert("album_name".into(), title.clone());
            }
            if let Some(artist) = album.get("artist").and_then(name_of) {
                values.insert("album_artist".into(), artist);
            }
            if let Some(count) = album.get("tracks_count") {
                values.insert("total_tracks".into(), count.clone());
            }
            if let Some(count) = album.get("media_count") {
                values.insert("total_discs".into(), count.clone());
            }
            if let Some(genre) = album.get("genre").and_then(name_of) {
                values.insert("genre".into(), genre);
            }
        }

        if let Some(date) = source.get("release_date_original") {
            values.insert("date".into(), date.clone());
        }

        if let Some(composer) = source.get("composer").and_then(name_of) {
            values.insert("composer".into(), composer);
        }

        if let Some(disc) = source.get("media_number") {
            values.insert("disc_number".into(), disc.clone());
        }

        Self { values }
    }

    /// Set or replace a single value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value of `key` as display text
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(display_value)
    }

    /// Render a template against this data
    pub fn render(&self, template: &str, missing: Option<&str>) -> String {
        render(template, &self.values, missing)
    }
}
