use async_trait::async_trait;
use geode_core::models::{Observation, ObservationMiss, SamplePoint};
use geode_core::ports::{
    CatalogError, CatalogItem, CatalogQuery, DateRange, ImageryCatalog, IndexEstimator,
    ObservationSource,
};
use std::time::Duration;

/// Half-width in degrees of the search window around a sample point
pub const QUERY_BUFFER_DEGREES: f64 = 0.02;

/// Scenes at or above this cloud-cover percentage are ignored
pub const MAX_CLOUD_COVER: f64 = 20.0;

/// Observation source backed by an imagery catalog and an index estimator.
///
/// Every query searches the summer season of the requested year in a small
/// window around the point and uses the first eligible scene. Any failure
/// becomes an [`ObservationMiss`].
pub struct CatalogObservationSource<C, E>
where
    C: ImageryCatalog,
    E: IndexEstimator,
{
    catalog: C,
    estimator: E,
    collection: String,
    timeout: Duration,
}

impl<C, E> CatalogObservationSource<C, E>
where
    C: ImageryCatalog,
    E: IndexEstimator,
{
    pub fn new(catalog: C, estimator: E, collection: impl Into<String>, timeout: Duration) -> Self {
        Self { catalog, estimator, collection: collection.into(), timeout }
    }

    /// Catalog query for a point and year, or `None` if the year is out of range
    pub fn query_for(&self, point: &SamplePoint, year: i32) -> Option<CatalogQuery> {
        Some(CatalogQuery {
            bbox: point.buffered(QUERY_BUFFER_DEGREES),
            range: DateRange::summer(year)?,
            collection: self.collection.clone(),
            max_cloud_cover: MAX_CLOUD_COVER,
            limit: 1,
        })
    }

    async fn lookup(
        &self,
        point: &SamplePoint,
        year: i32,
        query: &CatalogQuery,
    ) -> Result<Option<Observation>, CatalogError> {
        let items = self.catalog.search(query).await?;

        let Some(item) = items.into_iter().find(|item| is_eligible(item, query)) else {
            return Ok(None);
        };

        let index = self.estimator.estimate(point, year, &item).await?;
        if !index.is_finite() {
            return Err(CatalogError::Estimation(format!(
                "{} produced a non-finite value for {}",
                self.estimator.name(),
                item.id
            )));
        }

        tracing::debug!("Found {} scene {} acquired {}", year, item.id, item.acquired_at);

        Ok(Some(Observation {
            index,
            acquired_at: item.acquired_at,
            cloud_cover: item.cloud_cover.unwrap_or(0.0),
            preview: item.preview_href().map(str::to_string),
        }))
    }
}

#[async_trait]
impl<C, E> ObservationSource for CatalogObservationSource<C, E>
where
    C: ImageryCatalog,
    E: IndexEstimator,
{
    async fn fetch(&self, point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss> {
        let Some(query) = self.query_for(point, year) else {
            tracing::warn!("Year {} cannot be expressed as a query window", year);
            return Err(ObservationMiss::NoImagery);
        };

        match tokio::time::timeout(self.timeout, self.lookup(point, year, &query)).await {
            Ok(Ok(Some(observation))) => Ok(observation),
            Ok(Ok(None)) => {
                tracing::debug!(
                    "No {} imagery below {}% cloud cover at {:.3}, {:.3}",
                    year,
                    MAX_CLOUD_COVER,
                    point.lon,
                    point.lat
                );
                Err(ObservationMiss::NoImagery)
            }
            Ok(Err(CatalogError::Timeout)) | Err(_) => {
                tracing::warn!(
                    "Timeout while fetching {} data for point {:.3}, {:.3}",
                    year,
                    point.lon,
                    point.lat
                );
                Err(ObservationMiss::Timeout)
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    "Error fetching {} data for point {:.3}, {:.3}: {}",
                    year,
                    point.lon,
                    point.lat,
                    e
                );
                Err(ObservationMiss::Transport(e.to_string()))
            }
        }
    }
}

/// Re-check the catalog's filters; not every STAC API honours the query extension
fn is_eligible(item: &CatalogItem, query: &CatalogQuery) -> bool {
    item.cloud_cover.map_or(true, |cover| cover < query.max_cloud_cover)
        && query.range.contains(&item.acquired_at)
}
