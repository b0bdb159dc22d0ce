use tracing::instrument;

use super::FetchContext;
use crate::error::Result;
use crate::format::{rich_text_plain, NamedRef};
use crate::merge::{fetch_merged, LocalizedGroup};
use crate::model::StudentStory;
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "student-stories";
const POPULATE: [&str; 3] = ["photo", "university", "program"];

/// Newest stories first, at most `limit` of them.
#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext, limit: Option<usize>, locale: Locale) -> Result<Vec<StudentStory>> {
    let query = StrapiQuery::collection(COLLECTION)
        .populate(POPULATE)
        .sort("publishedAt:desc");
    let groups = fetch_merged(ctx.cms(), &query, locale, ctx.paging).await?;

    let mut dated: Vec<_> = groups
        .iter()
        .map(|g| (g.shared(|e| e.published_at()), project(ctx, g)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let stories = dated.into_iter().map(|(_, story)| story);
    Ok(match limit {
        Some(n) => stories.take(n).collect(),
        None => stories.collect(),
    })
}

pub fn project(ctx: &FetchContext, group: &LocalizedGroup) -> StudentStory {
    let name = group.text("name");
    let story = group.text_with(|e| {
        e.value("story")
            .map(rich_text_plain)
            .filter(|t| !t.is_empty())
    });
    StudentStory {
        id: group.list_id(),
        name_en: name.en,
        name_zh: name.zh,
        story_en: story.en,
        story_zh: story.zh,
        university: group
            .relation("university")
            .as_ref()
            .and_then(NamedRef::from_entry),
        program: group.relation("program").as_ref().and_then(NamedRef::from_entry),
        photo: group.shared(|e| ctx.media(e, "photo")),
    }
}
