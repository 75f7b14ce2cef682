use crate::models::{Observation, ObservationMiss, SamplePoint};
use async_trait::async_trait;

/// Port for obtaining a vegetation index observation for a point and year.
///
/// Implementations absorb every per-query failure into an [`ObservationMiss`];
/// nothing is raised past this boundary.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch(&self, point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss>;
}

#[async_trait]
impl<T: ObservationSource + ?Sized> ObservationSource for std::sync::Arc<T> {
    async fn fetch(&self, point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss> {
        (**self).fetch(point, year).await
    }
}
