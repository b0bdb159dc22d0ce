//! One fetcher module per content type.
//!
//! Fetchers build the Strapi query, run it through the injected [`CmsSource`]
//! and project merged records into view models. They return errors; deciding
//! whether an error becomes an empty list or an error response is up to the
//! route layer.
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::format;
use crate::merge::{LocalizedGroup, Paging};
use crate::strapi::{CmsSource, Entry};

pub mod blog;
pub mod faqs;
pub mod forms;
pub mod hero;
pub mod partners;
pub mod programs;
pub mod stories;
pub mod universities;

/// Everything a fetcher needs: the CMS handle plus formatting settings.
#[derive(Clone)]
pub struct FetchContext {
    pub cms: Arc<dyn CmsSource>,
    pub media_origin: String,
    pub excerpt_length: usize,
    pub paging: Paging,
}

impl fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchContext")
            .field("media_origin", &self.media_origin)
            .field("excerpt_length", &self.excerpt_length)
            .field("paging", &self.paging)
            .finish_non_exhaustive()
    }
}

impl FetchContext {
    pub fn new(cms: Arc<dyn CmsSource>, media_origin: impl Into<String>) -> Self {
        Self {
            cms,
            media_origin: media_origin.into(),
            excerpt_length: 160,
            paging: Paging::default(),
        }
    }

    pub fn from_config(cms: Arc<dyn CmsSource>, cfg: &Config) -> Self {
        Self {
            cms,
            media_origin: cfg.strapi.url.clone(),
            excerpt_length: cfg.content.excerpt_length,
            paging: Paging {
                page_size: cfg.strapi.page_size,
                max_pages: cfg.strapi.max_pages,
            },
        }
    }

    pub fn cms(&self) -> &dyn CmsSource {
        self.cms.as_ref()
    }

    pub fn media(&self, entry: &Entry, field: &str) -> Option<String> {
        format::media_of(entry, field, &self.media_origin, None)
    }
}

/// True when any variant's `relation` matches `wanted` by id, documentId,
/// slug or name. Matching runs after the merge so that a filter value in one
/// language does not drop the other language's records.
pub(crate) fn relation_matches(group: &LocalizedGroup, relation: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    if wanted.is_empty() {
        return true;
    }
    group
        .variants()
        .flat_map(|e| e.relations(relation))
        .any(|r| {
            r.id.to_string() == wanted
                || r.document_id.as_deref() == Some(wanted)
                || ["slug", "name", "title"]
                    .iter()
                    .any(|k| r.text(k).is_some_and(|v| v.eq_ignore_ascii_case(wanted)))
        })
}
