use crate::region::Region;
use geode_core::models::SamplePoint;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Default draw budget per requested point
pub const MAX_ATTEMPTS_PER_POINT: usize = 10;

/// Outcome of one sampling pass
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRun {
    /// Accepted points, in draw order
    pub points: Vec<SamplePoint>,

    /// Candidate draws made from the bounding box
    pub draws: usize,

    pub requested: usize,
}

impl SampleRun {
    /// Fewer points than requested were accepted
    pub fn is_short(&self) -> bool {
        self.points.len() < self.requested
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Uniform rejection sampler over a region's bounding box
pub struct Sampler<'a> {
    region: &'a Region,
}

impl<'a> Sampler<'a> {
    pub fn new(region: &'a Region) -> Self {
        Self { region }
    }

    /// Sample up to `n` points with a budget of `MAX_ATTEMPTS_PER_POINT * n` draws
    pub fn generate_default<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> SampleRun {
        self.generate(n, n.saturating_mul(MAX_ATTEMPTS_PER_POINT), rng)
    }

    /// Draw candidates uniformly from the bounding box until `n` fall inside
    /// the region or `max_attempts` draws have been made.
    ///
    /// A short run is not an error; callers decide what to do with it.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> SampleRun {
        let mut run = SampleRun { points: Vec::with_capacity(n), draws: 0, requested: n };

        if n == 0 {
            return run;
        }

        if self.region.is_degenerate() {
            tracing::warn!("Region encloses no area; skipping sampling");
            return run;
        }

        let bounds = self.region.bounds();
        let lon = Uniform::new_inclusive(bounds.min_lon, bounds.max_lon);
        let lat = Uniform::new_inclusive(bounds.min_lat, bounds.max_lat);

        while run.points.len() < n && run.draws < max_attempts {
            let candidate = SamplePoint::new(lon.sample(rng), lat.sample(rng));
            run.draws += 1;

            if self.region.contains(&candidate) {
                run.points.push(candidate);
            }
        }

        if run.is_short() {
            tracing::warn!(
                "Sampling shortfall: accepted {} of {} points after {} draws",
                run.points.len(),
                n,
                run.draws
            );
        } else {
            tracing::debug!("Sampled {} points in {} draws", run.points.len(), run.draws);
        }

        run
    }
}
