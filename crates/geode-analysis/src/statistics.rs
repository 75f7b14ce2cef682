use geode_core::error::{GeodeError, Result};
use geode_core::models::{ChangeRecord, ChangeSummary, DirectionCount};
use std::cmp;

/// Aggregate a set of change records.
///
/// Fails with [`GeodeError::EmptyDataset`] when `records` is empty. The
/// standard deviation uses the n - 1 denominator and is `None` for a single
/// record. The time period spans the earliest start-year acquisition to the
/// latest end-year acquisition.
pub fn summarize(records: &[ChangeRecord]) -> Result<ChangeSummary> {
    if records.is_empty() {
        return Err(GeodeError::EmptyDataset);
    }

    let count = records.len();
    let changes: Vec<f64> = records.iter().map(ChangeRecord::change).collect();

    let mean = changes.iter().sum::<f64>() / count as f64;
    let median = median(&changes);
    let std_dev = sample_std_dev(&changes, mean);

    let min = changes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = changes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let decreased = changes.iter().filter(|c| **c < 0.0).count();
    let increased = changes.iter().filter(|c| **c > 0.0).count();
    let unchanged = count - decreased - increased;

    let earliest_acquired =
        records.iter().map(ChangeRecord::start_acquired).fold(records[0].start_acquired(), cmp::min);
    let latest_acquired =
        records.iter().map(ChangeRecord::end_acquired).fold(records[0].end_acquired(), cmp::max);

    let mut significant: Vec<ChangeRecord> =
        records.iter().filter(|r| r.is_significant()).cloned().collect();
    significant.sort_by(|a, b| a.change().total_cmp(&b.change()));

    Ok(ChangeSummary {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
        decreased: DirectionCount::of(decreased, count),
        increased: DirectionCount::of(increased, count),
        unchanged,
        earliest_acquired,
        latest_acquired,
        significant,
    })
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    }
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use geode_core::models::{Observation, SamplePoint};

    fn record(change: f64, start_day: u32, end_day: u32) -> ChangeRecord {
        let start = Observation {
            index: 0.0,
            acquired_at: Utc.with_ymd_and_hms(2018, 7, start_day, 18, 0, 0).unwrap(),
            cloud_cover: 1.0,
            preview: None,
        };
        let end = Observation {
            index: change,
            acquired_at: Utc.with_ymd_and_hms(2023, 7, end_day, 18, 0, 0).unwrap(),
            cloud_cover: 2.0,
            preview: None,
        };
        ChangeRecord::pair(SamplePoint::new(-103.5, 44.0), 2018, start, 2023, end)
    }

    fn records(changes: &[f64]) -> Vec<ChangeRecord> {
        changes.iter().enumerate().map(|(i, c)| record(*c, 1 + i as u32, 1 + i as u32)).collect()
    }

    #[test]
    fn test_reference_summary() {
        let summary = summarize(&records(&[-0.3, -0.1, 0.0, 0.2])).unwrap();

        assert_eq!(summary.count, 4);
        assert!((summary.mean - -0.05).abs() < 1e-12);
        assert!((summary.median - -0.05).abs() < 1e-12);
        assert_eq!(summary.min, -0.3);
        assert_eq!(summary.max, 0.2);
        assert_eq!(summary.decreased.count, 2);
        assert!((summary.decreased.percent - 50.0).abs() < 1e-12);
        assert_eq!(summary.increased.count, 1);
        assert!((summary.increased.percent - 25.0).abs() < 1e-12);
        assert_eq!(summary.unchanged, 1);
    }

    #[test]
    fn test_sample_std_dev() {
        let summary = summarize(&records(&[-0.3, -0.1, 0.0, 0.2])).unwrap();
        // deviations from -0.05: -0.25, -0.05, 0.05, 0.25 -> sum of squares 0.13
        let expected = (0.13f64 / 3.0).sqrt();
        assert!((summary.std_dev.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_record_has_no_spread() {
        let summary = summarize(&records(&[-0.2])).unwrap();
        assert_eq!(summary.std_dev, None);
        assert_eq!(summary.median, -0.2);
        assert_eq!(summary.min, summary.max);
    }

    #[test]
    fn test_odd_count_median() {
        let summary = summarize(&records(&[0.3, -0.2, 0.1])).unwrap();
        assert_eq!(summary.median, 0.1);
    }

    #[test]
    fn test_significant_changes_sorted_ascending() {
        let summary = summarize(&records(&[0.2, -0.1, -0.3, 0.05, -0.15, 0.1])).unwrap();
        let changes: Vec<f64> = summary.significant.iter().map(ChangeRecord::change).collect();
        assert_eq!(changes, vec![-0.3, -0.15, 0.2]);
    }

    #[test]
    fn test_time_period() {
        let summary = summarize(&[record(0.1, 20, 3), record(-0.1, 5, 28)]).unwrap();
        assert_eq!(summary.earliest_acquired, Utc.with_ymd_and_hms(2018, 7, 5, 18, 0, 0).unwrap());
        assert_eq!(summary.latest_acquired, Utc.with_ymd_and_hms(2023, 7, 28, 18, 0, 0).unwrap());
    }

    #[test]
    fn test_single_record_time_period() {
        let summary = summarize(&[record(0.1, 9, 14)]).unwrap();
        assert_eq!(summary.earliest_acquired, Utc.with_ymd_and_hms(2018, 7, 9, 18, 0, 0).unwrap());
        assert_eq!(summary.latest_acquired, Utc.with_ymd_and_hms(2023, 7, 14, 18, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(matches!(summarize(&[]), Err(GeodeError::EmptyDataset)));
    }

    #[test]
    fn test_summary_is_order_independent() {
        let forward = summarize(&records(&[-0.3, 0.2, -0.1, 0.0])).unwrap();
        let backward = summarize(&records(&[0.0, -0.1, 0.2, -0.3])).unwrap();
        assert_eq!(forward.median, backward.median);
        assert_eq!(forward.min, backward.min);
        assert_eq!(forward.max, backward.max);
        assert_eq!(forward.decreased, backward.decreased);
    }
}
