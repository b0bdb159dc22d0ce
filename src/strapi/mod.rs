use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{GatewayError, Result};

pub mod model;
pub mod query;

pub use model::{Entry, Envelope, Locale, Pagination, Payload};
pub use query::{FilterOp, StrapiQuery};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The gateway's view of the CMS. [`StrapiClient`] talks HTTP; tests substitute
/// an in-memory double.
#[async_trait]
pub trait CmsSource: Send + Sync {
    async fn fetch(&self, query: &StrapiQuery) -> Result<Envelope>;

    /// POST `{ "data": data }` to a collection and return the created record.
    async fn create(&self, collection: &str, data: &Value) -> Result<Value>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct StrapiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for StrapiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrapiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StrapiClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.trim())?;
        // `Url::join` drops the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .user_agent("edusite-gateway/0.1")
            .build()?;
        let token = Some(token.into()).filter(|t| !t.trim().is_empty());
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.strapi.url, cfg.strapi.api_token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Base URL plus `segments`, each percent-encoded as exactly one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::invalid("strapi base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn build_fetch(&self, query: &StrapiQuery) -> Result<reqwest::Request> {
        let endpoint = self.endpoint(&query.segments())?;
        Ok(self
            .authorize(self.http.get(endpoint))
            .header("Accept", "application/json")
            .query(&query.to_pairs())
            .build()?)
    }

    pub fn build_create(&self, collection: &str, data: &Value) -> Result<reqwest::Request> {
        let endpoint = self.endpoint(&["api", collection])?;
        Ok(self
            .authorize(self.http.post(endpoint))
            .json(&json!({ "data": data }))
            .build()?)
    }

    async fn read_error(res: reqwest::Response) -> GatewayError {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        warn!(status, %body, "strapi returned an error");
        GatewayError::Upstream { status, body }
    }
}

#[async_trait]
impl CmsSource for StrapiClient {
    async fn fetch(&self, query: &StrapiQuery) -> Result<Envelope> {
        let request = self.build_fetch(query)?;
        debug!(url = %request.url(), "strapi fetch");
        let res = self.http.execute(request).await?;

        if res.status() == StatusCode::NOT_FOUND && query.document_id.is_some() {
            return Err(GatewayError::not_found(format!(
                "{} not found in {}",
                query.document_id.as_deref().unwrap_or_default(),
                query.collection
            )));
        }
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, collection: &str, data: &Value) -> Result<Value> {
        let request = self.build_create(collection, data)?;
        debug!(url = %request.url(), "strapi create");
        let res = self.http.execute(request).await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        let body: Value = res.json().await?;
        Ok(match body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    async fn ping(&self) -> Result<()> {
        let endpoint = self.base_url.join("_health")?;
        let res = self
            .authorize(self.http.get(endpoint))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(Self::read_error(res).await)
        }
    }
}
