//! HTTP catalog over the storefront's `/api/v1/variants` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{CatalogApi, FamilyPayload};
use crate::domain::VariantId;
use crate::{LoadError, VariantDetail, VariantProperties};

#[derive(Error, Debug)]
pub enum CatalogClientError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid catalog base URL {url}: {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Every non-2xx status other than 404 is reported as a [`LoadError::Network`];
/// there are no retries at this layer.
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogClientError> {
        let invalid = |reason: &str| CatalogClientError::BaseUrl { url: base_url.to_string(), reason: reason.to_string() };
        let base_url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// The id is pushed as a single percent-encoded path segment.
    fn url(&self, id: &VariantId, suffix: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v1", "variants", id.as_str()]).extend(suffix);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, id: &VariantId, suffix: Option<&str>) -> Result<T, LoadError> {
        let url = self.url(id, suffix);
        let network = |reason: String| LoadError::Network { url: url.to_string(), reason };

        let response = self.client.get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send().await
            .map_err(|e| network(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound { variant_id: id.clone() });
        }
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Catalog request failed");
            return Err(network(format!("unexpected HTTP status {}", status.as_u16())));
        }

        let body = response.bytes().await.map_err(|e| network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| LoadError::Malformed { variant_id: id.clone(), reason: e.to_string() })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn fetch_variant_detail(&self, id: &VariantId) -> Result<VariantDetail, LoadError> {
        self.get_json(id, None).await
    }

    async fn fetch_variant_family(&self, id: &VariantId) -> Result<FamilyPayload, LoadError> {
        self.get_json(id, Some("family")).await
    }

    async fn fetch_variant_properties(&self, id: &VariantId) -> Result<VariantProperties, LoadError> {
        self.get_json(id, Some("properties")).await
    }
}
