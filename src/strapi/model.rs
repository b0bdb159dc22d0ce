//! Strapi REST response shapes.
//!
//! Strapi v4 wraps every record as `{ id, attributes: {...} }` and every
//! relation as `{ data: ... }`; Strapi v5 returns flat records. Both are
//! normalized into [`Entry`] so the rest of the crate never inspects the
//! envelope again.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Language variant of a CMS record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    #[serde(alias = "zh-CN", alias = "zh-Hans", alias = "zh-cn")]
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    pub fn other(&self) -> Locale {
        match self {
            Locale::En => Locale::Zh,
            Locale::Zh => Locale::En,
        }
    }

    /// Both locales, preferred one first.
    pub fn preference(preferred: Locale) -> [Locale; 2] {
        [preferred, preferred.other()]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Locale::Zh),
            _ => Err(format!("unsupported locale '{}'", s)),
        }
    }
}

/// One record exactly as Strapi sent it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    /// v4: `{ id, attributes }`.
    Legacy {
        id: i64,
        attributes: Map<String, Value>,
    },
    /// v5: attributes inline next to `id` and `documentId`.
    Flat(Map<String, Value>),
}

/// A normalized CMS record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub document_id: Option<String>,
    pub locale: Option<Locale>,
    pub fields: Map<String, Value>,
}

impl RawEntry {
    pub fn normalize(self) -> Option<Entry> {
        let (id, mut fields) = match self {
            RawEntry::Legacy { id, attributes } => (id, attributes),
            RawEntry::Flat(mut map) => {
                let id = map.remove("id").and_then(|v| as_i64(&v))?;
                (id, map)
            }
        };
        let document_id = fields
            .remove("documentId")
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty());
        let locale = fields
            .get("locale")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());
        Some(Entry {
            id,
            document_id,
            locale,
            fields,
        })
    }
}

fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

impl Entry {
    pub fn from_value(value: Value) -> Option<Entry> {
        match serde_json::from_value::<RawEntry>(value) {
            Ok(raw) => raw.normalize(),
            Err(err) => {
                warn!(?err, "skipping unparseable strapi entry");
                None
            }
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Non-blank string field, trimmed.
    pub fn text(&self, key: &str) -> Option<String> {
        self.str(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(as_i64)
    }

    pub fn datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        self.str(key)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.datetime("publishedAt")
    }

    /// First record of a populated relation.
    pub fn relation(&self, key: &str) -> Option<Entry> {
        self.value(key)
            .map(unwrap_relation)
            .and_then(|v| v.into_iter().next())
    }

    /// All records of a populated relation.
    pub fn relations(&self, key: &str) -> Vec<Entry> {
        self.value(key).map(unwrap_relation).unwrap_or_default()
    }
}

/// Accepts `{data: obj}`, `{data: [..]}`, `{data: null}`, a bare object or a bare array.
pub fn unwrap_relation(value: &Value) -> Vec<Entry> {
    let inner = match value {
        Value::Object(map) if map.contains_key("data") => &map["data"],
        other => other,
    };
    match inner {
        Value::Array(items) => items.iter().cloned().filter_map(Entry::from_value).collect(),
        Value::Object(_) => Entry::from_value(inner.clone()).into_iter().collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub pagination: Option<Pagination>,
}

/// Top-level `{ data, meta }` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub data: Value,
    pub meta: Meta,
}

/// What the `data` member turned out to hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Many(Vec<Entry>),
    One(Entry),
    Empty,
}

impl Envelope {
    pub fn many(items: Vec<Value>) -> Self {
        Self {
            data: Value::Array(items),
            meta: Meta::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.meta.pagination = Some(pagination);
        self
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.pagination.as_ref()
    }

    pub fn into_payload(self) -> Payload {
        match self.data {
            Value::Array(items) => {
                Payload::Many(items.into_iter().filter_map(Entry::from_value).collect())
            }
            obj @ Value::Object(_) => match Entry::from_value(obj) {
                Some(entry) => Payload::One(entry),
                None => Payload::Empty,
            },
            Value::Null => Payload::Empty,
            other => {
                warn!(kind = %value_kind(&other), "unexpected strapi data member");
                Payload::Empty
            }
        }
    }

    /// Entries regardless of whether `data` held a list or a single record.
    pub fn into_entries(self) -> Vec<Entry> {
        match self.into_payload() {
            Payload::Many(entries) => entries,
            Payload::One(entry) => vec![entry],
            Payload::Empty => Vec::new(),
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
