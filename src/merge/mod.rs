//! Bilingual merge layer.
//!
//! Strapi stores each language of a content item as its own record; records
//! that belong together share a `documentId`. This module folds them back into
//! one [`LocalizedGroup`] per logical item and exposes text fields as
//! [`Bilingual`] pairs where a missing language borrows from the other one.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::strapi::{Entry, Locale};

mod fetch;

pub use fetch::{fetch_all, fetch_document, fetch_merged, resolve_by_field, Detail, Paging};

/// An English/Chinese pair of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bilingual<T = String> {
    pub en: T,
    pub zh: T,
}

impl Bilingual<String> {
    /// Missing or blank sides are filled from the other side.
    pub fn from_options(en: Option<String>, zh: Option<String>) -> Self {
        let en = en.filter(|s| !s.trim().is_empty());
        let zh = zh.filter(|s| !s.trim().is_empty());
        match (en, zh) {
            (Some(en), Some(zh)) => Self { en, zh },
            (Some(en), None) => Self { zh: en.clone(), en },
            (None, Some(zh)) => Self { en: zh.clone(), zh },
            (None, None) => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.zh.is_empty()
    }
}

impl Bilingual<Value> {
    /// Same fallback rule as the string form, for structured values such as rich-text blocks.
    pub fn from_values(en: Option<Value>, zh: Option<Value>) -> Self {
        let en = en.filter(|v| !is_blank(v));
        let zh = zh.filter(|v| !is_blank(v));
        match (en, zh) {
            (Some(en), Some(zh)) => Self { en, zh },
            (Some(en), None) => Self { zh: en.clone(), en },
            (None, Some(zh)) => Self { en: zh.clone(), zh },
            (None, None) => Self {
                en: Value::Null,
                zh: Value::Null,
            },
        }
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// All language variants of one content item.
///
/// The first variant seen becomes `primary`; shared, non-text attributes are
/// read from it and only fall through to the other variant when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedGroup {
    pub key: String,
    pub document_id: Option<String>,
    primary_locale: Locale,
    primary: Entry,
    secondary: Option<Entry>,
}

impl LocalizedGroup {
    pub fn new(locale: Locale, entry: Entry) -> Self {
        let locale = entry.locale.unwrap_or(locale);
        Self {
            key: group_key(locale, &entry),
            document_id: entry.document_id.clone(),
            primary_locale: locale,
            primary: entry,
            secondary: None,
        }
    }

    /// Build a group from one record whose `localizations` relation carries
    /// the other language (Strapi v4 style).
    pub fn from_nested(locale: Locale, entry: Entry) -> Self {
        let nested = entry.relations("localizations");
        let mut group = Self::new(locale, entry);
        for other in nested {
            let other_locale = other.locale.unwrap_or(group.primary_locale.other());
            group.insert(other_locale, other);
        }
        group
    }

    /// Returns false when a record for that locale is already present.
    pub fn insert(&mut self, locale: Locale, entry: Entry) -> bool {
        let locale = entry.locale.unwrap_or(locale);
        if locale == self.primary_locale || self.secondary.is_some() {
            debug!(key = %self.key, %locale, id = entry.id, "duplicate locale record ignored");
            return false;
        }
        if self.document_id.is_none() {
            self.document_id = entry.document_id.clone();
        }
        self.secondary = Some(entry);
        true
    }

    pub fn primary_locale(&self) -> Locale {
        self.primary_locale
    }

    pub fn primary(&self) -> &Entry {
        &self.primary
    }

    pub fn get(&self, locale: Locale) -> Option<&Entry> {
        if locale == self.primary_locale {
            Some(&self.primary)
        } else {
            self.secondary.as_ref()
        }
    }

    /// True when `entry` is one of this group's variants, matched by
    /// `documentId` or by the record id of an inline localization.
    pub fn covers(&self, entry: &Entry) -> bool {
        let same_document = self.document_id.is_some() && self.document_id == entry.document_id;
        same_document || self.variants().any(|v| v.id == entry.id)
    }

    pub fn has_both(&self) -> bool {
        self.secondary.is_some()
    }

    /// Id exposed by list views: the locale-independent `documentId`.
    pub fn list_id(&self) -> String {
        self.document_id.clone().unwrap_or_else(|| self.key.clone())
    }

    pub fn variants(&self) -> impl Iterator<Item = &Entry> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    pub fn text(&self, field: &str) -> Bilingual {
        self.text_with(|e| e.text(field))
    }

    pub fn text_with<F>(&self, f: F) -> Bilingual
    where
        F: Fn(&Entry) -> Option<String>,
    {
        Bilingual::from_options(
            self.get(Locale::En).and_then(&f),
            self.get(Locale::Zh).and_then(&f),
        )
    }

    pub fn values(&self, field: &str) -> Bilingual<Value> {
        Bilingual::from_values(
            self.get(Locale::En).and_then(|e| e.value(field).cloned()),
            self.get(Locale::Zh).and_then(|e| e.value(field).cloned()),
        )
    }

    /// First non-empty result, primary variant first.
    pub fn shared<T, F>(&self, f: F) -> Option<T>
    where
        F: Fn(&Entry) -> Option<T>,
    {
        self.variants().find_map(f)
    }

    /// A to-one relation, taken from whichever variant has it populated.
    pub fn relation(&self, name: &str) -> Option<Entry> {
        self.shared(|e| e.relation(name))
    }

    pub fn relations(&self, name: &str) -> Vec<Entry> {
        self.variants()
            .map(|e| e.relations(name))
            .find(|list| !list.is_empty())
            .unwrap_or_default()
    }
}

fn group_key(locale: Locale, entry: &Entry) -> String {
    match &entry.document_id {
        Some(doc) => doc.clone(),
        None => format!("{}:{}", locale, entry.id),
    }
}

/// Fold locale batches into groups keyed by `documentId`, in first-seen order.
///
/// Pass the preferred locale's batch first: its records seed the groups and
/// therefore supply the shared attributes.
pub fn group_by_document<I>(batches: I) -> Vec<LocalizedGroup>
where
    I: IntoIterator<Item = (Locale, Vec<Entry>)>,
{
    let mut groups: Vec<LocalizedGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (locale, entries) in batches {
        for entry in entries {
            let key = group_key(entry.locale.unwrap_or(locale), &entry);
            match index.get(&key) {
                Some(&i) => {
                    groups[i].insert(locale, entry);
                }
                None => {
                    index.insert(key, groups.len());
                    groups.push(LocalizedGroup::new(locale, entry));
                }
            }
        }
    }
    groups
}

/// One page of an in-memory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total: usize,
}

pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1) as usize;
    let total = items.len();
    let total_pages = total.div_ceil(limit) as u32;
    let start = (page as usize - 1).saturating_mul(limit);
    let items = items.into_iter().skip(start).take(limit).collect();
    Page {
        items,
        page,
        total_pages,
        total,
    }
}
