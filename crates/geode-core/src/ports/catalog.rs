use crate::models::{BoundingBox, SamplePoint};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by imagery catalog adapters
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request timed out")]
    Timeout,

    #[error("Catalog returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Catalog transport error: {0}")]
    Transport(String),

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("Index estimation failed: {0}")]
    Estimation(String),
}

/// Inclusive acquisition time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// June 1 through August 31 of `year`, the peak of the growing season.
    ///
    /// Returns `None` for years chrono cannot represent.
    pub fn summer(year: i32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, 6, 1, 0, 0, 0).single()?;
        let end = Utc.with_ymd_and_hms(year, 8, 31, 23, 59, 59).single()?;
        Some(Self { start, end })
    }

    /// RFC 3339 interval, e.g. `2018-06-01T00:00:00Z/2018-08-31T23:59:59Z`
    pub fn to_interval(&self) -> String {
        format!(
            "{}/{}",
            self.start.format("%Y-%m-%dT%H:%M:%SZ"),
            self.end.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Search request against an imagery catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub bbox: BoundingBox,
    pub range: DateRange,
    pub collection: String,

    /// Only scenes with cloud cover strictly below this percentage are eligible
    pub max_cloud_cover: f64,

    pub limit: u32,
}

/// One scene returned by a catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub acquired_at: DateTime<Utc>,

    /// Cloud cover percentage, when the catalog reports it
    pub cloud_cover: Option<f64>,

    /// Asset key to href
    pub assets: HashMap<String, String>,
}

impl CatalogItem {
    /// Href of the true-colour preview, falling back to the thumbnail
    pub fn preview_href(&self) -> Option<&str> {
        self.assets
            .get("visual")
            .or_else(|| self.assets.get("thumbnail"))
            .map(String::as_str)
    }
}

/// Port for imagery catalogs such as STAC APIs
#[async_trait]
pub trait ImageryCatalog: Send + Sync {
    /// Search for scenes matching the query, most relevant first
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Port for turning a catalog scene into a vegetation index value at a point
#[async_trait]
pub trait IndexEstimator: Send + Sync {
    async fn estimate(
        &self,
        point: &SamplePoint,
        year: i32,
        item: &CatalogItem,
    ) -> Result<f64, CatalogError>;

    /// Name shown in reports
    fn name(&self) -> &str;
}
