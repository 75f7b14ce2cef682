//! STAC API item search adapter.
//!
//! Covers the subset of `POST /search` the change analysis needs: bbox,
//! datetime interval, collection, the `eo:cloud_cover` query extension, and
//! asset hrefs. Only the first page is requested.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geode_core::ports::{CatalogError, CatalogItem, CatalogQuery, ImageryCatalog};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Async client for a STAC API
pub struct StacClient {
    /// Root URL of the API (e.g., "https://earth-search.aws.element84.com/v1")
    root_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl StacClient {
    /// Create a client whose requests are bounded by `request_timeout`
    pub fn new(root_url: impl Into<String>, request_timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CatalogError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { root_url: root_url.into(), client })
    }

    /// Full `POST /search` URL
    pub fn search_url(&self) -> String {
        let base = self.root_url.trim_end_matches('/');
        if base.ends_with("/search") {
            base.to_string()
        } else {
            format!("{}/search", base)
        }
    }
}

#[async_trait]
impl ImageryCatalog for StacClient {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, CatalogError> {
        let request = StacSearchRequest::from_query(query);

        let response = self
            .client
            .post(self.search_url())
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let collection: StacItemCollection = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Decode(format!("parsing STAC response: {e}")))?;

        Ok(collection.into_catalog_items())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Transport(e.to_string())
    }
}

/// Body for `POST /search`
#[derive(Debug, Clone, Serialize)]
struct StacSearchRequest {
    bbox: [f64; 4],
    datetime: String,
    collections: Vec<String>,
    limit: u32,
    query: serde_json::Value,
}

impl StacSearchRequest {
    fn from_query(query: &CatalogQuery) -> Self {
        Self {
            bbox: query.bbox.to_array(),
            datetime: query.range.to_interval(),
            collections: vec![query.collection.clone()],
            limit: query.limit,
            query: serde_json::json!({ "eo:cloud_cover": { "lt": query.max_cloud_cover } }),
        }
    }
}

/// A STAC Item Collection (GeoJSON FeatureCollection)
#[derive(Debug, Deserialize)]
struct StacItemCollection {
    #[serde(default)]
    features: Vec<StacItem>,
}

impl StacItemCollection {
    fn into_catalog_items(self) -> Vec<CatalogItem> {
        self.features
            .into_iter()
            .filter_map(|item| {
                let id = item.id.clone();
                let converted = item.into_catalog_item();
                if converted.is_none() {
                    tracing::debug!("Skipping STAC item {} without a parseable datetime", id);
                }
                converted
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct StacItem {
    id: String,
    properties: StacItemProperties,
    #[serde(default)]
    assets: HashMap<String, StacAsset>,
}

impl StacItem {
    fn into_catalog_item(self) -> Option<CatalogItem> {
        let acquired_at = DateTime::parse_from_rfc3339(self.properties.datetime.as_deref()?)
            .ok()?
            .with_timezone(&Utc);

        Some(CatalogItem {
            id: self.id,
            acquired_at,
            cloud_cover: self.properties.eo_cloud_cover,
            assets: self.assets.into_iter().map(|(key, asset)| (key, asset.href)).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StacItemProperties {
    datetime: Option<String>,

    #[serde(rename = "eo:cloud_cover")]
    eo_cloud_cover: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StacAsset {
    href: String,
}
