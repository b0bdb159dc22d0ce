use tracing::instrument;

use super::{relation_matches, FetchContext};
use crate::error::Result;
use crate::format::{excerpt, rich_text_plain, NamedRef};
use crate::merge::{fetch_merged, paginate, resolve_by_field, LocalizedGroup};
use crate::model::{BlogList, BlogPost};
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "blogs";
const POPULATE: [&str; 2] = ["cover", "category"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogParams {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub locale: Locale,
}

fn base_query() -> StrapiQuery {
    StrapiQuery::collection(COLLECTION)
        .populate(POPULATE)
        .sort("publishedAt:desc")
}

/// Merged, newest-first page of posts.
#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext, params: &BlogParams) -> Result<BlogList> {
    let groups = fetch_merged(ctx.cms(), &base_query(), params.locale, ctx.paging).await?;
    let mut posts: Vec<BlogPost> = groups
        .iter()
        .filter(|g| {
            params
                .category
                .as_deref()
                .map_or(true, |c| relation_matches(g, "category", c))
        })
        .map(|g| project(ctx, g, g.list_id(), false))
        .collect();
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let page = paginate(posts, params.page, params.limit);
    Ok(BlogList {
        posts: page.items,
        total_pages: page.total_pages,
        total_posts: page.total,
        current_page: page.page,
    })
}

/// One post by slug in either language, with full content.
#[instrument(skip(ctx))]
pub async fn detail(ctx: &FetchContext, slug: &str) -> Result<BlogPost> {
    let detail = resolve_by_field(ctx.cms(), &base_query(), "slug", slug).await?;
    Ok(project(ctx, &detail.group, detail.origin_id.to_string(), true))
}

pub fn project(ctx: &FetchContext, group: &LocalizedGroup, id: String, with_content: bool) -> BlogPost {
    let title = group.text("title");
    let summary = group.text_with(|e| {
        e.text("excerpt")
            .or_else(|| e.value("content").map(rich_text_plain))
            .filter(|t| !t.is_empty())
            .map(|t| excerpt(&t, ctx.excerpt_length))
    });
    let (content_en, content_zh) = if with_content {
        let content = group.values("content");
        (Some(content.en), Some(content.zh))
    } else {
        (None, None)
    };

    BlogPost {
        id,
        slug: group.shared(|e| e.text("slug")).unwrap_or_default(),
        title_en: title.en,
        title_zh: title.zh,
        excerpt_en: summary.en,
        excerpt_zh: summary.zh,
        content_en,
        content_zh,
        published_at: group.shared(|e| e.published_at()),
        cover_image: group.shared(|e| ctx.media(e, "cover")),
        category: group.relation("category").as_ref().and_then(NamedRef::from_entry),
        author: group.shared(|e| e.text("author")),
    }
}
