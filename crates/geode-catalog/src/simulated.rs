//! Simulated NDVI estimator.
//!
//! Stands in for band math over the scene's red and near-infrared assets.
//! The baseline year reads as healthy vegetation everywhere. Later years
//! decline, most sharply inside two fixed zones. All readings carry Gaussian
//! noise.

use async_trait::async_trait;
use geode_core::models::SamplePoint;
use geode_core::ports::{CatalogError, CatalogItem, IndexEstimator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::sync::Mutex;

const NOISE_STD_DEV: f64 = 0.05;

const BASELINE_MEAN: f64 = 0.7;
const STRONG_DECLINE_MEAN: f64 = 0.4;
const MODERATE_DECLINE_MEAN: f64 = 0.5;
const SLIGHT_DECLINE_MEAN: f64 = 0.65;

/// (min lon, max lon, min lat, max lat)
const STRONG_DECLINE_ZONE: (f64, f64, f64, f64) = (-103.6, -103.4, 43.8, 44.0);
const MODERATE_DECLINE_ZONE: (f64, f64, f64, f64) = (-103.8, -103.7, 43.6, 43.8);

pub struct SimulatedNdvi {
    baseline_year: i32,
    rng: Mutex<StdRng>,
}

impl SimulatedNdvi {
    /// Create an estimator treating `baseline_year` as the healthy reference
    pub fn new(baseline_year: i32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { baseline_year, rng: Mutex::new(rng) }
    }

    /// Mean NDVI expected at a point in a given year
    pub fn expected_mean(&self, point: &SamplePoint, year: i32) -> f64 {
        if year == self.baseline_year {
            BASELINE_MEAN
        } else if in_zone(point, STRONG_DECLINE_ZONE) {
            STRONG_DECLINE_MEAN
        } else if in_zone(point, MODERATE_DECLINE_ZONE) {
            MODERATE_DECLINE_MEAN
        } else {
            SLIGHT_DECLINE_MEAN
        }
    }
}

fn in_zone(point: &SamplePoint, (min_lon, max_lon, min_lat, max_lat): (f64, f64, f64, f64)) -> bool {
    (min_lon..=max_lon).contains(&point.lon) && (min_lat..=max_lat).contains(&point.lat)
}

#[async_trait]
impl IndexEstimator for SimulatedNdvi {
    async fn estimate(
        &self,
        point: &SamplePoint,
        year: i32,
        _item: &CatalogItem,
    ) -> Result<f64, CatalogError> {
        let normal = Normal::new(self.expected_mean(point, year), NOISE_STD_DEV)
            .map_err(|e| CatalogError::Estimation(e.to_string()))?;

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| CatalogError::Estimation("simulation RNG lock poisoned".to_string()))?;

        Ok(normal.sample(&mut *rng).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        "simulated-ndvi"
    }
}
