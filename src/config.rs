//! Configuration loader and validator for the CMS gateway.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::strapi::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub strapi: Strapi,
    pub content: Content,
}

/// Listener settings for the gateway itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
}

/// Strapi connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Strapi {
    pub url: String,
    pub api_token: String,
    /// Page size used when walking a collection.
    pub page_size: u32,
    /// Upper bound on pages fetched per collection walk.
    pub max_pages: u32,
}

/// Presentation knobs applied by the formatter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Content {
    pub excerpt_length: usize,
    pub default_locale: Locale,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            environment: "development".into(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for Strapi {
    fn default() -> Self {
        Self {
            url: "http://localhost:1337".into(),
            api_token: String::new(),
            page_size: 100,
            max_pages: 20,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            excerpt_length: 160,
            default_locale: Locale::En,
        }
    }
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply `STRAPI_URL`, `STRAPI_API_TOKEN`, `EXPRESS_PORT` and `NODE_ENV`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup("STRAPI_URL") {
            self.strapi.url = url.trim().to_string();
        }
        if let Some(token) = lookup("STRAPI_API_TOKEN") {
            self.strapi.api_token = token.trim().to_string();
        }
        if let Some(port) = lookup("EXPRESS_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("EXPRESS_PORT must be a port number"))?;
        }
        if let Some(env) = lookup("NODE_ENV") {
            self.server.environment = env.trim().to_string();
        }
        Ok(())
    }
}

/// Load configuration from a YAML file, apply environment overrides and validate.
/// - If `path` is None, uses `config.yaml` in the current working directory.
/// - A missing file is not an error; defaults plus environment are used.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)?
    } else {
        info!(path = %path.display(), "config file not found; using defaults");
        Config::default()
    };
    cfg.apply_env()?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid("server.host must be non-empty"));
    }
    if cfg.server.port == 0 {
        return Err(ConfigError::Invalid("server.port must be > 0"));
    }

    if cfg.strapi.url.trim().is_empty() {
        return Err(ConfigError::Invalid("strapi.url must be non-empty"));
    }
    match url::Url::parse(&cfg.strapi.url) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        _ => return Err(ConfigError::Invalid("strapi.url must be an http(s) URL")),
    }
    if !(1..=100).contains(&cfg.strapi.page_size) {
        return Err(ConfigError::Invalid("strapi.page_size must be within 1..=100"));
    }
    if cfg.strapi.max_pages == 0 {
        return Err(ConfigError::Invalid("strapi.max_pages must be > 0"));
    }

    if cfg.content.excerpt_length == 0 {
        return Err(ConfigError::Invalid("content.excerpt_length must be > 0"));
    }

    Ok(())
}

/// Returns an example YAML configuration.
pub fn example() -> &'static str {
    r#"server:
  host: "0.0.0.0"
  port: 3001
  environment: "development"
  cors_origins:
    - "http://localhost:5173"

strapi:
  url: "http://localhost:1337"
  api_token: "YOUR_STRAPI_API_TOKEN"
  page_size: 100
  max_pages: 20

content:
  excerpt_length: 160
  default_locale: "en"
"#
}
