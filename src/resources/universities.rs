use tracing::instrument;

use super::{relation_matches, FetchContext};
use crate::error::Result;
use crate::format::{rich_text_plain, NamedRef};
use crate::merge::{fetch_merged, LocalizedGroup};
use crate::model::University;
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "universities";
const POPULATE: [&str; 3] = ["logo", "country", "destination"];

/// Universities ranked first, unranked after, then by English name.
#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext, country: Option<&str>, locale: Locale) -> Result<Vec<University>> {
    let query = StrapiQuery::collection(COLLECTION).populate(POPULATE);
    let groups = fetch_merged(ctx.cms(), &query, locale, ctx.paging).await?;
    let mut universities: Vec<University> = groups
        .iter()
        .filter(|g| country.map_or(true, |c| relation_matches(g, "country", c)))
        .map(|g| project(ctx, g))
        .collect();
    universities.sort_by(|a, b| {
        let rank = |u: &University| u.ranking.unwrap_or(i64::MAX);
        rank(a).cmp(&rank(b)).then_with(|| a.name_en.cmp(&b.name_en))
    });
    Ok(universities)
}

pub fn project(ctx: &FetchContext, group: &LocalizedGroup) -> University {
    let name = group.text("name");
    let description = group.text_with(|e| {
        e.value("description")
            .map(rich_text_plain)
            .filter(|t| !t.is_empty())
    });
    University {
        id: group.list_id(),
        name_en: name.en,
        name_zh: name.zh,
        description_en: description.en,
        description_zh: description.zh,
        country: group.relation("country").as_ref().and_then(NamedRef::from_entry),
        destination: group
            .relation("destination")
            .as_ref()
            .and_then(NamedRef::from_entry),
        logo: group.shared(|e| ctx.media(e, "logo")),
        ranking: group.shared(|e| e.i64("ranking")),
        website: group.shared(|e| e.text("website")),
    }
}
