use futures::future::join;
use tracing::{instrument, warn};

use super::FetchContext;
use crate::error::Result;
use crate::merge::{fetch_all, LocalizedGroup};
use crate::model::HeroBanner;
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "hero-banners";

/// Home page banners, merged across languages and sorted by `order`.
///
/// The preferred locale is requested with `localizations` populated so a
/// banner's translation can arrive inline. The other locale is fetched
/// alongside it; its records complete groups that lack an inline
/// translation and become groups of their own when they exist only in
/// that language.
#[instrument(skip(ctx))]
pub async fn banners(ctx: &FetchContext, locale: Locale) -> Result<Vec<HeroBanner>> {
    let other = locale.other();
    let nested_query = StrapiQuery::collection(COLLECTION)
        .locale(locale)
        .populate(["image", "localizations"]);
    let other_query = StrapiQuery::collection(COLLECTION)
        .locale(other)
        .populate(["image"]);
    let (preferred, rest) = join(
        fetch_all(ctx.cms(), &nested_query, ctx.paging),
        fetch_all(ctx.cms(), &other_query, ctx.paging),
    )
    .await;

    let (preferred, rest) = match (preferred, rest) {
        (Err(err), Err(_)) => return Err(err),
        (Ok(preferred), Err(err)) => {
            warn!(?err, locale = %other, "hero banner fetch failed; using the other language");
            (preferred, Vec::new())
        }
        (Err(err), Ok(rest)) => {
            warn!(?err, %locale, "hero banner fetch failed; using the other language");
            (Vec::new(), rest)
        }
        (Ok(preferred), Ok(rest)) => (preferred, rest),
    };

    let mut groups: Vec<LocalizedGroup> = preferred
        .into_iter()
        .map(|e| LocalizedGroup::from_nested(locale, e))
        .collect();
    for entry in rest {
        match groups.iter_mut().find(|g| g.covers(&entry)) {
            Some(group) => {
                group.insert(other, entry);
            }
            None => groups.push(LocalizedGroup::new(other, entry)),
        }
    }

    let mut banners: Vec<HeroBanner> = groups.iter().map(|g| project(ctx, g)).collect();
    banners.sort_by_key(|b| b.order);
    Ok(banners)
}

pub fn project(ctx: &FetchContext, group: &LocalizedGroup) -> HeroBanner {
    let title = group.text("title");
    let subtitle = group.text("subtitle");
    let cta = group.text("cta_text");
    HeroBanner {
        id: group.list_id(),
        title_en: title.en,
        title_zh: title.zh,
        subtitle_en: subtitle.en,
        subtitle_zh: subtitle.zh,
        cta_text_en: cta.en,
        cta_text_zh: cta.zh,
        cta_link: group.shared(|e| e.text("cta_link")),
        image: group.shared(|e| ctx.media(e, "image")),
        order: group.shared(|e| e.i64("order")).unwrap_or_default(),
    }
}
