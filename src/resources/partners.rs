use tracing::instrument;

use super::FetchContext;
use crate::error::Result;
use crate::merge::fetch_all;
use crate::model::PartnerLogo;
use crate::strapi::{Entry, StrapiQuery};

pub const COLLECTION: &str = "partner-logos";

/// Partner logos are not localized; one locale-less fetch.
#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext) -> Result<Vec<PartnerLogo>> {
    let query = StrapiQuery::collection(COLLECTION)
        .populate(["logo"])
        .sort("order:asc");
    let entries = fetch_all(ctx.cms(), &query, ctx.paging).await?;
    let mut logos: Vec<PartnerLogo> = entries.iter().map(|e| project(ctx, e)).collect();
    logos.sort_by_key(|l| l.order);
    Ok(logos)
}

pub fn project(ctx: &FetchContext, entry: &Entry) -> PartnerLogo {
    PartnerLogo {
        id: entry.id,
        name: entry.text("name").unwrap_or_default(),
        logo: ctx.media(entry, "logo"),
        url: entry.text("url"),
        order: entry.i64("order").unwrap_or_default(),
    }
}
