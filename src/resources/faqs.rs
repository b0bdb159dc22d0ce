use tracing::instrument;

use super::{relation_matches, FetchContext};
use crate::error::{GatewayError, Result};
use crate::format::rich_text_plain;
use crate::merge::{fetch_merged, LocalizedGroup};
use crate::model::Faq;
use crate::strapi::{Locale, StrapiQuery};

pub const COLLECTION: &str = "faqs";

fn base_query() -> StrapiQuery {
    StrapiQuery::collection(COLLECTION).sort("order:asc")
}

async fn merged(ctx: &FetchContext, locale: Locale, category: Option<&str>) -> Result<Vec<Faq>> {
    let groups = fetch_merged(ctx.cms(), &base_query(), locale, ctx.paging).await?;
    let mut faqs: Vec<Faq> = groups
        .iter()
        .filter(|g| category.map_or(true, |c| category_matches(g, c)))
        .map(project)
        .collect();
    faqs.sort_by_key(|f| f.order);
    Ok(faqs)
}

/// A category is either plain text or a relation; either language's value counts.
fn category_matches(group: &LocalizedGroup, wanted: &str) -> bool {
    group.variants().any(|e| {
        e.text("category")
            .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
    }) || relation_matches(group, "category", wanted)
}

/// All FAQs merged across languages, in display order.
#[instrument(skip(ctx))]
pub async fn list(ctx: &FetchContext, locale: Locale, category: Option<&str>) -> Result<Vec<Faq>> {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    merged(ctx, locale, category).await
}

/// Case-insensitive substring search over both languages' questions and answers.
#[instrument(skip(ctx))]
pub async fn search(ctx: &FetchContext, query: &str, locale: Locale) -> Result<Vec<Faq>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(GatewayError::invalid("search query must not be empty"));
    }
    let mut faqs = merged(ctx, locale, None).await?;
    faqs.retain(|faq| {
        [&faq.question_en, &faq.question_zh, &faq.answer_en, &faq.answer_zh]
            .iter()
            .any(|text| text.to_lowercase().contains(&needle))
    });
    Ok(faqs)
}

pub fn project(group: &LocalizedGroup) -> Faq {
    let question = group.text("question");
    let answer = group.text_with(|e| {
        e.value("answer")
            .map(rich_text_plain)
            .filter(|t| !t.is_empty())
    });
    Faq {
        id: group.list_id(),
        question_en: question.en,
        question_zh: question.zh,
        answer_en: answer.en,
        answer_zh: answer.zh,
        category: group.shared(|e| {
            e.text("category")
                .or_else(|| e.relation("category").and_then(|c| c.text("name")))
        }),
        order: group.shared(|e| e.i64("order")).unwrap_or_default(),
    }
}
