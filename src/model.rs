//! View models returned to the frontend.
//!
//! Text fields come in `_en`/`_zh` pairs; both halves are filled whenever either
//! language exists in the CMS.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::NamedRef;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    /// `documentId` in lists, the numeric record id in detail views.
    pub id: String,
    pub slug: String,
    pub title_en: String,
    pub title_zh: String,
    pub excerpt_en: String,
    pub excerpt_zh: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_en: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_zh: Option<Value>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,
    pub cover_image: Option<String>,
    pub category: Option<NamedRef>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub id: String,
    pub slug: Option<String>,
    pub title_en: String,
    pub title_zh: String,
    pub description_en: String,
    pub description_zh: String,
    pub duration_en: String,
    pub duration_zh: String,
    pub grade: Option<NamedRef>,
    pub program_type: Option<NamedRef>,
    pub countries: Vec<NamedRef>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faq {
    pub id: String,
    pub question_en: String,
    pub question_zh: String,
    pub answer_en: String,
    pub answer_zh: String,
    pub category: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct University {
    pub id: String,
    pub name_en: String,
    pub name_zh: String,
    pub description_en: String,
    pub description_zh: String,
    pub country: Option<NamedRef>,
    pub destination: Option<NamedRef>,
    pub logo: Option<String>,
    pub ranking: Option<i64>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStory {
    pub id: String,
    pub name_en: String,
    pub name_zh: String,
    pub story_en: String,
    pub story_zh: String,
    pub university: Option<NamedRef>,
    pub program: Option<NamedRef>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerLogo {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroBanner {
    pub id: String,
    pub title_en: String,
    pub title_zh: String,
    pub subtitle_en: String,
    pub subtitle_zh: String,
    pub cta_text_en: String,
    pub cta_text_zh: String,
    pub cta_link: Option<String>,
    pub image: Option<String>,
    pub order: i64,
}

/// Contact form body accepted from the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogList {
    pub posts: Vec<BlogPost>,
    pub total_pages: u32,
    pub total_posts: usize,
    pub current_page: u32,
}

impl BlogList {
    pub fn empty(current_page: u32) -> Self {
        Self {
            posts: Vec::new(),
            total_pages: 0,
            total_posts: 0,
            current_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramList {
    pub programs: Vec<Program>,
    pub total_pages: u32,
    pub total_items: usize,
    pub current_page: u32,
}

impl ProgramList {
    pub fn empty(current_page: u32) -> Self {
        Self {
            programs: Vec::new(),
            total_pages: 0,
            total_items: 0,
            current_page,
        }
    }
}
