//! Integration tests for the change analyzer
//!
//! These tests drive the analyzer end to end with in-memory observation
//! sources standing in for the imagery catalog.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use geode_analysis::{summarize, ChangeAnalyzer};
use geode_core::error::GeodeError;
use geode_core::models::{Observation, ObservationMiss, SamplePoint};
use geode_core::ports::ObservationSource;
use geode_geo::Region;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn square() -> Region {
    Region::new(vec![[-104.0, 44.0], [-103.0, 44.0], [-103.0, 45.0], [-104.0, 45.0], [-104.0, 44.0]])
        .unwrap()
}

fn observation(index: f64, year: i32) -> Observation {
    Observation {
        index,
        acquired_at: Utc.with_ymd_and_hms(year, 7, 14, 18, 0, 0).unwrap(),
        cloud_cover: 6.0,
        preview: Some(format!("https://example.com/{year}/TCI.tif")),
    }
}

/// Returns a fixed index per year: 0.7 for 2018, 0.4 otherwise
struct YearlyIndex;

#[async_trait]
impl ObservationSource for YearlyIndex {
    async fn fetch(&self, _point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss> {
        let index = if year == 2018 { 0.7 } else { 0.4 };
        Ok(observation(index, year))
    }
}

/// Fails the first `failures` queries for `failing_year`
struct FlakyYear {
    failing_year: i32,
    failures: usize,
    miss: ObservationMiss,
    seen: AtomicUsize,
}

impl FlakyYear {
    fn new(failing_year: i32, failures: usize, miss: ObservationMiss) -> Self {
        Self { failing_year, failures, miss, seen: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl ObservationSource for FlakyYear {
    async fn fetch(&self, point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss> {
        if year == self.failing_year && self.seen.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(self.miss.clone());
        }
        YearlyIndex.fetch(point, year).await
    }
}

/// Tracks the peak number of concurrent queries
#[derive(Default)]
struct CountingSource {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl ObservationSource for CountingSource {
    async fn fetch(&self, point: &SamplePoint, year: i32) -> Result<Observation, ObservationMiss> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        YearlyIndex.fetch(point, year).await
    }
}

#[tokio::test]
async fn test_uniform_decline_end_to_end() {
    let analyzer = ChangeAnalyzer::new(square(), YearlyIndex);
    let mut rng = StdRng::seed_from_u64(2018);

    let records = analyzer.analyze_with_rng(2018, 2023, 5, &mut rng).await.unwrap();

    assert_eq!(records.len(), 5);
    for record in &records {
        assert_eq!(record.change(), record.end_index() - record.start_index());
        assert!((record.change() - -0.3).abs() < 1e-12);
        assert!(analyzer.region().contains(&record.point()));
        assert_eq!(record.start_preview(), Some("https://example.com/2018/TCI.tif"));
    }

    let summary = summarize(&records).unwrap();
    assert!((summary.mean - -0.3).abs() < 1e-12);
    assert_eq!(summary.decreased.count, 5);
    assert!((summary.decreased.percent - 100.0).abs() < 1e-12);
    assert_eq!(summary.increased.count, 0);
    assert_eq!(summary.significant.len(), 5);
}

#[tokio::test]
async fn test_partial_end_year_failure_drops_points() {
    let source = FlakyYear::new(2023, 2, ObservationMiss::NoImagery);
    let analyzer = ChangeAnalyzer::new(square(), source);
    let mut rng = StdRng::seed_from_u64(11);

    let analysis = analyzer.run(2018, 2023, 5, &mut rng).await.unwrap();

    assert_eq!(analysis.records.len(), 3);
    assert_eq!(analysis.diagnostics.sampled_points, 5);
    assert_eq!(analysis.diagnostics.paired_points, 3);
    assert_eq!(analysis.diagnostics.dropped_points, 2);
    assert_eq!(analysis.diagnostics.end_misses.no_imagery, 2);
    assert_eq!(analysis.diagnostics.start_misses.total(), 0);
}

#[tokio::test]
async fn test_missing_start_year_never_produces_records() {
    let source = FlakyYear::new(2018, usize::MAX, ObservationMiss::Timeout);
    let analyzer = ChangeAnalyzer::new(square(), source);
    let mut rng = StdRng::seed_from_u64(3);

    let analysis = analyzer.run(2018, 2023, 4, &mut rng).await.unwrap();

    assert!(analysis.records.is_empty());
    assert_eq!(analysis.diagnostics.dropped_points, 4);
    assert_eq!(analysis.diagnostics.timeouts(), 4);
    assert!(matches!(summarize(&analysis.records), Err(GeodeError::EmptyDataset)));
}

#[tokio::test]
async fn test_degenerate_region_is_insufficient() {
    let line = Region::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]).unwrap();
    let analyzer = ChangeAnalyzer::new(line, YearlyIndex);
    let mut rng = StdRng::seed_from_u64(1);

    let result = analyzer.analyze_with_rng(2018, 2023, 5, &mut rng).await;

    assert!(matches!(result, Err(GeodeError::InsufficientSamples { requested: 5, draws: 0 })));
}

#[tokio::test]
async fn test_zero_points_is_insufficient() {
    let analyzer = ChangeAnalyzer::new(square(), YearlyIndex);
    let mut rng = StdRng::seed_from_u64(1);

    let result = analyzer.run(2018, 2023, 0, &mut rng).await;

    assert!(matches!(result, Err(GeodeError::InsufficientSamples { requested: 0, draws: 0 })));
}

#[tokio::test]
async fn test_records_follow_sampling_order() {
    let analyzer = ChangeAnalyzer::new(square(), CountingSource::default()).with_concurrency(8);
    let mut rng = StdRng::seed_from_u64(21);

    let analysis = analyzer.run(2018, 2023, 12, &mut rng).await.unwrap();

    let record_points: Vec<SamplePoint> = analysis.records.iter().map(|r| r.point()).collect();
    assert_eq!(record_points, analysis.points);
}

#[tokio::test]
async fn test_concurrency_limit_bounds_in_flight_queries() {
    let source = std::sync::Arc::new(CountingSource::default());
    let analyzer = ChangeAnalyzer::new(square(), source.clone()).with_concurrency(2);
    let mut rng = StdRng::seed_from_u64(8);

    let records = analyzer.analyze_with_rng(2018, 2023, 10, &mut rng).await.unwrap();

    assert_eq!(records.len(), 10);
    // Two points at a time, each with both years in flight
    assert!(source.peak.load(Ordering::SeqCst) <= 4);
    assert!(source.peak.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_analyze_with_entropy_source() {
    let analyzer = ChangeAnalyzer::new(square(), YearlyIndex);

    let records = analyzer.analyze(2018, 2023, 3).await.unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| analyzer.region().contains(&r.point())));
}
