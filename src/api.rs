use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ContentError;
use crate::types::{Course, Envelope, Rule};

pub const RULES_RESOURCE: &str = "academic rules";
pub const COURSES_RESOURCE: &str = "courses";

/// Where the academics collections come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_rules(&self) -> Result<Vec<Rule>, ContentError>;
    async fn fetch_courses(&self) -> Result<Vec<Course>, ContentError>;
}

/// Headless-CMS client: `GET {base}/api/<collection>` returning `{ "data": [...] }`.
pub struct HttpSource {
    client: reqwest::Client,
    rules_url: Url,
    courses_url: Url,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            rules_url: collection_url(base_url, "academicrules")?,
            courses_url: collection_url(base_url, "courses")?,
        })
    }

    async fn get_collection<T: DeserializeOwned>(&self, url: &Url, resource: &'static str) -> Result<Vec<T>, ContentError> {
        debug!(%url, resource, "fetching collection");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ContentError::Network { resource, source })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ContentError::Status { resource, status: status.as_u16() });
        }
        let body = resp.text().await.map_err(|source| ContentError::Network { resource, source })?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|source| ContentError::Parse { resource, source })?;
        debug!(resource, items = envelope.data.len(), "collection fetched");
        Ok(envelope.data)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_rules(&self) -> Result<Vec<Rule>, ContentError> {
        self.get_collection(&self.rules_url, RULES_RESOURCE).await
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, ContentError> {
        self.get_collection(&self.courses_url, COURSES_RESOURCE).await
    }
}

fn collection_url(base: &str, collection: &str) -> Result<Url> {
    let raw = format!("{}/api/{}", base.trim_end_matches('/'), collection);
    Url::parse(&raw).with_context(|| format!("invalid CMS url: {raw}"))
}
