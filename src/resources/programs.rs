use tracing::instrument;

use super::{relation_matches, FetchContext};
use crate::error::Result;
use crate::format::{rich_text_plain, NamedRef};
use crate::merge::{fetch_document, fetch_merged, paginate, LocalizedGroup};
use crate::model::{Program, ProgramList};
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "programs";
const POPULATE: [&str; 4] = ["image", "grade", "program_type", "countries"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramParams {
    pub page: u32,
    pub limit: u32,
    pub grade: Option<String>,
    pub program_type: Option<String>,
    pub locale: Locale,
}

fn base_query() -> StrapiQuery {
    StrapiQuery::collection(COLLECTION)
        .populate(POPULATE)
        .sort("title:asc")
}

#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext, params: &ProgramParams) -> Result<ProgramList> {
    let groups = fetch_merged(ctx.cms(), &base_query(), params.locale, ctx.paging).await?;
    let programs: Vec<Program> = groups
        .iter()
        .filter(|g| {
            params
                .grade
                .as_deref()
                .map_or(true, |v| relation_matches(g, "grade", v))
        })
        .filter(|g| {
            params
                .program_type
                .as_deref()
                .map_or(true, |v| relation_matches(g, "program_type", v))
        })
        .map(|g| project(ctx, g, g.list_id()))
        .collect();

    let page = paginate(programs, params.page, params.limit);
    Ok(ProgramList {
        programs: page.items,
        total_pages: page.total_pages,
        total_items: page.total,
        current_page: page.page,
    })
}

/// One program by `documentId`, both languages fetched concurrently.
#[instrument(skip(ctx))]
pub async fn detail(ctx: &FetchContext, document_id: &str) -> Result<Program> {
    let detail = fetch_document(ctx.cms(), &base_query(), document_id).await?;
    Ok(project(ctx, &detail.group, detail.origin_id.to_string()))
}

pub fn project(ctx: &FetchContext, group: &LocalizedGroup, id: String) -> Program {
    let title = group.text("title");
    let description = group.text_with(|e| {
        e.value("description")
            .map(rich_text_plain)
            .filter(|t| !t.is_empty())
    });
    let duration = group.text("duration");

    Program {
        id,
        slug: group.shared(|e| e.text("slug")),
        title_en: title.en,
        title_zh: title.zh,
        description_en: description.en,
        description_zh: description.zh,
        duration_en: duration.en,
        duration_zh: duration.zh,
        grade: group.relation("grade").as_ref().and_then(NamedRef::from_entry),
        program_type: group
            .relation("program_type")
            .as_ref()
            .and_then(NamedRef::from_entry),
        countries: group
            .relations("countries")
            .iter()
            .filter_map(NamedRef::from_entry)
            .collect(),
        image: group.shared(|e| ctx.media(e, "image")),
    }
}
