#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use edusite_gateway::api::{build_router, AppState};
use edusite_gateway::error::{GatewayError, Result};
use edusite_gateway::merge::Paging;
use edusite_gateway::resources::FetchContext;
use edusite_gateway::strapi::query::Populate;
use edusite_gateway::strapi::{CmsSource, Envelope, Locale, Pagination, StrapiQuery};

pub const ORIGIN: &str = "http://cms.test";

/// In-memory Strapi: answers locale, `$eq` filter, document and pagination
/// queries over seeded records and records every query it receives.
#[derive(Default)]
pub struct FakeStrapi {
    records: Mutex<Vec<(String, Value)>>,
    failing: AtomicBool,
    failing_locale: Mutex<Option<Locale>>,
    unhealthy: AtomicBool,
    queries: Mutex<Vec<StrapiQuery>>,
    created: Mutex<Vec<(String, Value)>>,
}

impl FakeStrapi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed(&self, collection: &str, records: Vec<Value>) {
        let mut guard = self.records.lock().await;
        guard.extend(records.into_iter().map(|r| (collection.to_string(), r)));
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub async fn fail_locale(&self, locale: Locale) {
        *self.failing_locale.lock().await = Some(locale);
    }

    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }

    pub async fn queries(&self) -> Vec<StrapiQuery> {
        self.queries.lock().await.clone()
    }

    pub async fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().await.clone()
    }

    fn upstream_error() -> GatewayError {
        GatewayError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        }
    }
}

fn field<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    record
        .get(name)
        .or_else(|| record.get("attributes").and_then(|a| a.get(name)))
}

fn field_str(record: &Value, name: &str) -> Option<String> {
    field(record, name).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[async_trait]
impl CmsSource for FakeStrapi {
    async fn fetch(&self, query: &StrapiQuery) -> Result<Envelope> {
        self.queries.lock().await.push(query.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        if query.locale.is_some() && *self.failing_locale.lock().await == query.locale {
            return Err(Self::upstream_error());
        }

        let records = self.records.lock().await;
        let mut matched: Vec<Value> = records
            .iter()
            .filter(|(collection, _)| *collection == query.collection)
            .map(|(_, record)| record)
            .filter(|record| match (query.locale, field_str(record, "locale")) {
                (Some(wanted), Some(have)) => have == wanted.as_str(),
                (None, Some(have)) => have == "en",
                (_, None) => true,
            })
            .filter(|record| {
                query.filters.iter().all(|f| {
                    f.path.len() != 1
                        || field_str(record, &f.path[0]).as_deref() == Some(f.value.as_str())
                })
            })
            .cloned()
            .collect();

        let wants_localizations = match &query.populate {
            Populate::All => true,
            Populate::Fields(fields) => fields.iter().any(|f| f == "localizations"),
            Populate::None => false,
        };
        if !wants_localizations {
            for record in matched.iter_mut() {
                if let Some(map) = record.as_object_mut() {
                    map.remove("localizations");
                }
            }
        }

        if let Some(document_id) = &query.document_id {
            let found = matched
                .into_iter()
                .find(|r| field_str(r, "documentId").as_deref() == Some(document_id.as_str()));
            return match found {
                Some(record) => Ok(Envelope {
                    data: record,
                    ..Default::default()
                }),
                None => Err(GatewayError::not_found(format!("{} missing", document_id))),
            };
        }

        let total = matched.len();
        let page = query.page.unwrap_or(1) as usize;
        let page_size = query.page_size.unwrap_or(25) as usize;
        let data: Vec<Value> = matched
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        Ok(Envelope::many(data).with_pagination(Pagination {
            page: page as u32,
            page_size: page_size as u32,
            page_count: total.div_ceil(page_size) as u32,
            total: total as u64,
        }))
    }

    async fn create(&self, collection: &str, data: &Value) -> Result<Value> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::upstream_error());
        }
        let mut created = self.created.lock().await;
        created.push((collection.to_string(), data.clone()));
        let mut record = data.clone();
        if let Some(map) = record.as_object_mut() {
            map.insert("id".into(), json!(created.len()));
            map.insert("documentId".into(), json!(format!("submission-{}", created.len())));
        }
        Ok(record)
    }

    async fn ping(&self) -> Result<()> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(GatewayError::Upstream {
                status: 503,
                body: "down".into(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn context(fake: Arc<FakeStrapi>) -> FetchContext {
    let mut ctx = FetchContext::new(fake, ORIGIN);
    ctx.paging = Paging {
        page_size: 5,
        max_pages: 10,
    };
    ctx
}

pub fn router(fake: Arc<FakeStrapi>) -> Router {
    let state = AppState {
        ctx: context(fake),
        default_locale: Locale::En,
        environment: "test".into(),
    };
    build_router(Arc::new(state))
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub fn blog(doc: &str, id: i64, locale: &str, slug: &str, title: &str, published: &str) -> Value {
    json!({
        "id": id,
        "documentId": doc,
        "locale": locale,
        "slug": slug,
        "title": title,
        "content": [
            { "type": "paragraph", "children": [{ "type": "text", "text": format!("{} body text", title) }] }
        ],
        "publishedAt": published,
        "cover": { "id": 900 + id, "url": format!("/uploads/{}.jpg", slug) },
        "category": { "id": 1, "name": "News", "slug": "news" },
    })
}

pub fn faq(doc: &str, id: i64, locale: &str, question: &str, answer: &str, order: i64) -> Value {
    json!({
        "id": id,
        "documentId": doc,
        "locale": locale,
        "question": question,
        "answer": answer,
        "category": "general",
        "order": order,
    })
}

pub fn program(doc: &str, id: i64, locale: &str, title: &str, grade: Option<(i64, &str)>) -> Value {
    json!({
        "id": id,
        "documentId": doc,
        "locale": locale,
        "slug": doc,
        "title": title,
        "description": format!("About {}", title),
        "duration": "4 weeks",
        "grade": grade.map(|(gid, name)| json!({ "id": gid, "name": name })),
        "program_type": { "id": 3, "name": "Summer Camp" },
        "countries": [{ "id": 7, "name": "Canada" }],
        "image": { "id": 1, "url": "https://cdn.example.com/p.png" },
    })
}
