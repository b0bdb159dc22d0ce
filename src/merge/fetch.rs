use futures::future::join;
use tracing::{debug, instrument, warn};

use super::{group_by_document, LocalizedGroup};
use crate::error::{GatewayError, Result};
use crate::strapi::query::is_document_id;
use crate::strapi::{CmsSource, Entry, FilterOp, Locale, StrapiQuery};

/// How far a collection walk may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 20,
        }
    }
}

/// A merged detail record plus the numeric id of the record the lookup resolved through.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub group: LocalizedGroup,
    pub origin_id: i64,
}

/// Fetch every page of `query`, bounded by `paging.max_pages`.
#[instrument(skip_all, fields(collection = %query.collection, locale = ?query.locale))]
pub async fn fetch_all(
    cms: &dyn CmsSource,
    query: &StrapiQuery,
    paging: Paging,
) -> Result<Vec<Entry>> {
    let first = cms.fetch(&query.clone().page(1, paging.page_size)).await?;
    let page_count = first.pagination().map(|p| p.page_count).unwrap_or(1);
    let mut entries = first.into_entries();

    let last = page_count.min(paging.max_pages);
    if page_count > paging.max_pages {
        warn!(page_count, max_pages = paging.max_pages, "collection truncated");
    }
    for page in 2..=last {
        let envelope = cms.fetch(&query.clone().page(page, paging.page_size)).await?;
        entries.extend(envelope.into_entries());
    }
    debug!(count = entries.len(), "collection fetched");
    Ok(entries)
}

/// Fetch both locales of `query` concurrently and merge them by `documentId`.
///
/// One failing locale is logged and treated as empty; the call only fails when
/// both locales fail.
pub async fn fetch_merged(
    cms: &dyn CmsSource,
    query: &StrapiQuery,
    preferred: Locale,
    paging: Paging,
) -> Result<Vec<LocalizedGroup>> {
    let [first, second] = Locale::preference(preferred);
    let first_query = query.clone().locale(first);
    let second_query = query.clone().locale(second);
    let (a, b) = join(
        fetch_all(cms, &first_query, paging),
        fetch_all(cms, &second_query, paging),
    )
    .await;

    let (a, b) = match (a, b) {
        (Err(err), Err(_)) => return Err(err),
        (Ok(a), Err(err)) => {
            warn!(?err, locale = %second, "locale fetch failed; using the other language");
            (a, Vec::new())
        }
        (Err(err), Ok(b)) => {
            warn!(?err, locale = %first, "locale fetch failed; using the other language");
            (Vec::new(), b)
        }
        (Ok(a), Ok(b)) => (a, b),
    };
    Ok(group_by_document([(first, a), (second, b)]))
}

/// Look a record up by a unique field (usually `slug`), English first.
///
/// The first locale that yields a record carrying a `documentId` decides the
/// item; both locales are then fetched by that id. When neither locale
/// produces a `documentId` the lookup is a not-found.
#[instrument(skip(cms, query), fields(collection = %query.collection))]
pub async fn resolve_by_field(
    cms: &dyn CmsSource,
    query: &StrapiQuery,
    field: &str,
    value: &str,
) -> Result<Detail> {
    for locale in Locale::ALL {
        let lookup = query
            .clone()
            .locale(locale)
            .filter(field, FilterOp::Eq, value)
            .page(1, 1);
        let found = cms.fetch(&lookup).await?.into_entries().into_iter().next();
        let Some(origin) = found else {
            debug!(%locale, "no record for this locale");
            continue;
        };
        let Some(document_id) = origin.document_id.clone() else {
            debug!(%locale, id = origin.id, "record has no documentId");
            continue;
        };

        let by_document = query.clone().filter(
            "documentId",
            FilterOp::Eq,
            document_id.as_str(),
        );
        let (en, zh) = join(
            first_entry(cms, by_document.clone().locale(Locale::En)),
            first_entry(cms, by_document.locale(Locale::Zh)),
        )
        .await;
        let group = build_group(en?, zh?).unwrap_or_else(|| LocalizedGroup::new(locale, origin.clone()));
        return Ok(Detail {
            group,
            origin_id: origin.id,
        });
    }
    Err(GatewayError::not_found(format!(
        "no {} found for {} '{}'",
        query.collection, field, value
    )))
}

/// Fetch both locale variants of one `documentId`. Ids that are not plain
/// tokens are rejected as invalid without contacting the CMS.
#[instrument(skip(cms, query), fields(collection = %query.collection))]
pub async fn fetch_document(
    cms: &dyn CmsSource,
    query: &StrapiQuery,
    document_id: &str,
) -> Result<Detail> {
    if !is_document_id(document_id) {
        return Err(GatewayError::invalid(format!(
            "'{}' is not a valid document id",
            document_id
        )));
    }
    let target = query.clone().document(document_id);
    let (en, zh) = join(
        single_entry(cms, target.clone().locale(Locale::En)),
        single_entry(cms, target.locale(Locale::Zh)),
    )
    .await;
    match build_group(en?, zh?) {
        Some(group) => Ok(Detail {
            origin_id: group.primary().id,
            group,
        }),
        None => Err(GatewayError::not_found(format!(
            "no {} found for id '{}'",
            query.collection, document_id
        ))),
    }
}

fn build_group(en: Option<Entry>, zh: Option<Entry>) -> Option<LocalizedGroup> {
    match (en, zh) {
        (Some(en), zh) => {
            let mut group = LocalizedGroup::new(Locale::En, en);
            if let Some(zh) = zh {
                group.insert(Locale::Zh, zh);
            }
            Some(group)
        }
        (None, Some(zh)) => Some(LocalizedGroup::new(Locale::Zh, zh)),
        (None, None) => None,
    }
}

async fn first_entry(cms: &dyn CmsSource, query: StrapiQuery) -> Result<Option<Entry>> {
    Ok(cms.fetch(&query).await?.into_entries().into_iter().next())
}

/// A missing locale of a single document comes back as 404; that is an absence, not an error.
async fn single_entry(cms: &dyn CmsSource, query: StrapiQuery) -> Result<Option<Entry>> {
    match first_entry(cms, query).await {
        Err(GatewayError::NotFound(msg)) => {
            debug!(%msg, "locale variant absent");
            Ok(None)
        }
        other => other,
    }
}
