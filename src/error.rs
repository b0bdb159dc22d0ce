//! Error type shared by the CMS client, the merge layer and the fetchers.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to reach Strapi: {0}")]
    Http(#[from] reqwest::Error),
    #[error("strapi error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("invalid JSON from Strapi: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
}

impl GatewayError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// True for failures that originate on the CMS side of the gateway.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Upstream { .. } | Self::Json(_))
    }
}
