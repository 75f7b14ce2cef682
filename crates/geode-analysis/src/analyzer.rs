use futures::stream::{self, StreamExt};
use geode_core::config::DEFAULT_CONCURRENCY;
use geode_core::error::{GeodeError, Result};
use geode_core::models::{ChangeRecord, Observation, ObservationMiss, SamplePoint};
use geode_core::ports::ObservationSource;
use geode_geo::{Region, SampleRun, Sampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Per-kind tally of observation misses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissCounts {
    pub no_imagery: usize,
    pub timeouts: usize,
    pub transport: usize,
}

impl MissCounts {
    pub fn record(&mut self, miss: &ObservationMiss) {
        match miss {
            ObservationMiss::NoImagery => self.no_imagery += 1,
            ObservationMiss::Timeout => self.timeouts += 1,
            ObservationMiss::Transport(_) => self.transport += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_imagery + self.timeouts + self.transport
    }
}

/// Quality indicators for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunDiagnostics {
    pub requested_points: usize,
    pub sampled_points: usize,
    pub draws: usize,
    pub paired_points: usize,

    /// Points dropped because at least one year had no observation
    pub dropped_points: usize,

    pub start_misses: MissCounts,
    pub end_misses: MissCounts,
}

impl RunDiagnostics {
    pub fn sampling_shortfall(&self) -> usize {
        self.requested_points.saturating_sub(self.sampled_points)
    }

    pub fn timeouts(&self) -> usize {
        self.start_misses.timeouts + self.end_misses.timeouts
    }
}

/// Records produced by a run together with its diagnostics
#[derive(Debug, Clone)]
pub struct ChangeAnalysis {
    pub start_year: i32,
    pub end_year: i32,
    pub points: Vec<SamplePoint>,
    pub records: Vec<ChangeRecord>,
    pub diagnostics: RunDiagnostics,
}

/// Samples points in a region and pairs their observations across two years.
///
/// Per-point failures never abort a run: a point with a missing observation in
/// either year is dropped and counted in [`RunDiagnostics`].
pub struct ChangeAnalyzer<S>
where
    S: ObservationSource,
{
    region: Region,
    source: S,
    concurrency: usize,
}

impl<S> ChangeAnalyzer<S>
where
    S: ObservationSource,
{
    pub fn new(region: Region, source: S) -> Self {
        Self { region, source, concurrency: DEFAULT_CONCURRENCY }
    }

    /// Limit the number of points whose queries are in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Change records for `n_points` freshly sampled points
    pub async fn analyze(
        &self,
        start_year: i32,
        end_year: i32,
        n_points: usize,
    ) -> Result<Vec<ChangeRecord>> {
        let mut rng = StdRng::from_entropy();
        self.analyze_with_rng(start_year, end_year, n_points, &mut rng).await
    }

    /// Like [`analyze`](Self::analyze) with an injected random source
    pub async fn analyze_with_rng<R: Rng + ?Sized>(
        &self,
        start_year: i32,
        end_year: i32,
        n_points: usize,
        rng: &mut R,
    ) -> Result<Vec<ChangeRecord>> {
        Ok(self.run(start_year, end_year, n_points, rng).await?.records)
    }

    /// Sample, observe, and pair, keeping the run diagnostics
    pub async fn run<R: Rng + ?Sized>(
        &self,
        start_year: i32,
        end_year: i32,
        n_points: usize,
        rng: &mut R,
    ) -> Result<ChangeAnalysis> {
        let sample = self.sample(n_points, rng)?;
        Ok(self.observe(start_year, end_year, sample).await)
    }

    /// Sample points, failing only when none could be placed.
    ///
    /// A request for zero points places none, so it also yields
    /// [`GeodeError::InsufficientSamples`].
    pub fn sample<R: Rng + ?Sized>(&self, n_points: usize, rng: &mut R) -> Result<SampleRun> {
        let sample = Sampler::new(&self.region).generate_default(n_points, rng);
        if sample.is_empty() {
            return Err(GeodeError::InsufficientSamples {
                requested: sample.requested,
                draws: sample.draws,
            });
        }
        tracing::info!("Generated {} random points within polygon", sample.points.len());
        Ok(sample)
    }

    /// Query both years for every sampled point and pair the successes
    pub async fn observe(&self, start_year: i32, end_year: i32, sample: SampleRun) -> ChangeAnalysis {
        let total = sample.points.len();

        let mut outcomes: Vec<PointOutcome> = stream::iter(sample.points.iter().copied().enumerate())
            .map(|(position, point)| async move {
                tracing::debug!(
                    "Processing point {}/{} at {:.3}, {:.3}",
                    position + 1,
                    total,
                    point.lon,
                    point.lat
                );
                let (start, end) = tokio::join!(
                    self.source.fetch(&point, start_year),
                    self.source.fetch(&point, end_year)
                );
                PointOutcome { position, point, start, end }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; report in sampling order
        outcomes.sort_by_key(|outcome| outcome.position);

        let mut diagnostics = RunDiagnostics {
            requested_points: sample.requested,
            sampled_points: total,
            draws: sample.draws,
            ..Default::default()
        };
        let mut records = Vec::with_capacity(total);

        for outcome in outcomes {
            match (outcome.start, outcome.end) {
                (Ok(start), Ok(end)) => {
                    tracing::debug!(
                        "NDVI values - {}: {:.3}, {}: {:.3}",
                        start_year,
                        start.index,
                        end_year,
                        end.index
                    );
                    records.push(ChangeRecord::pair(outcome.point, start_year, start, end_year, end));
                }
                (start, end) => {
                    if let Err(miss) = &start {
                        diagnostics.start_misses.record(miss);
                    }
                    if let Err(miss) = &end {
                        diagnostics.end_misses.record(miss);
                    }
                    diagnostics.dropped_points += 1;
                    tracing::debug!(
                        "No valid data found for point {:.3}, {:.3}",
                        outcome.point.lon,
                        outcome.point.lat
                    );
                }
            }
        }

        diagnostics.paired_points = records.len();

        tracing::info!(
            "Paired {} of {} sampled points ({} dropped, {} timeouts, {} start-year misses, {} end-year misses)",
            diagnostics.paired_points,
            diagnostics.sampled_points,
            diagnostics.dropped_points,
            diagnostics.timeouts(),
            diagnostics.start_misses.total(),
            diagnostics.end_misses.total()
        );

        ChangeAnalysis { start_year, end_year, points: sample.points, records, diagnostics }
    }
}

struct PointOutcome {
    position: usize,
    point: SamplePoint,
    start: std::result::Result<Observation, ObservationMiss>,
    end: std::result::Result<Observation, ObservationMiss>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_counts() {
        let mut counts = MissCounts::default();
        counts.record(&ObservationMiss::NoImagery);
        counts.record(&ObservationMiss::Timeout);
        counts.record(&ObservationMiss::Timeout);
        counts.record(&ObservationMiss::Transport("reset".to_string()));

        assert_eq!(counts.no_imagery, 1);
        assert_eq!(counts.timeouts, 2);
        assert_eq!(counts.transport, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_sampling_shortfall() {
        let diagnostics =
            RunDiagnostics { requested_points: 10, sampled_points: 7, ..Default::default() };
        assert_eq!(diagnostics.sampling_shortfall(), 3);
    }
}
