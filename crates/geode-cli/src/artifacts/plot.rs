//! Statistical plot of the per-point change analysis
//!
//! The left panel compares start-year and end-year NDVI for every sample
//! point; the right panel is a histogram of the changes with the zero line
//! and the mean and median marked.

use anyhow::{bail, Result};
use geode_core::models::{ChangeRecord, ChangeSummary};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

pub const PLOT_FILE: &str = "ndvi_analysis.svg";

const WIDTH: u32 = 1500;
const HEIGHT: u32 = 600;
const HISTOGRAM_BINS: usize = 20;
const BAR_WIDTH: f64 = 0.35;

const START_COLOR: RGBColor = RGBColor(34, 139, 34);
const END_COLOR: RGBColor = RGBColor(144, 238, 144);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Render both panels side by side into an SVG file at `path`
pub fn write_plot(path: &Path, records: &[ChangeRecord], summary: &ChangeSummary) -> Result<()> {
    if records.is_empty() {
        bail!("No change records to plot");
    }

    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, 2));
    draw_comparison(&areas[0], records)?;
    draw_distribution(&areas[1], records, summary)?;

    root.present()?;
    Ok(())
}

fn draw_comparison(area: &Area<'_>, records: &[ChangeRecord]) -> Result<()> {
    let (start_year, end_year) = (records[0].start_year(), records[0].end_year());

    let (low, high) = records
        .iter()
        .flat_map(|r| [r.start_index(), r.end_index()])
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((high - low) * 0.1).max(0.05);
    let y_min = if low < 0.0 { low - pad } else { 0.0 };
    let y_max = high + pad;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("NDVI Values Comparison ({start_year} vs {end_year})"), ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(-0.5..records.len() as f64 - 0.5, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Sample Point")
        .y_desc("NDVI")
        .x_label_formatter(&|x| {
            if x.fract().abs() < 1e-9 {
                format!("{}", *x as i64 + 1)
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()?;

    chart
        .draw_series(records.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x - BAR_WIDTH, 0.0), (x, r.start_index())], START_COLOR.filled())
        }))?
        .label(start_year.to_string())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], START_COLOR.filled()));

    chart
        .draw_series(records.iter().enumerate().map(|(i, r)| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + BAR_WIDTH, r.end_index())], END_COLOR.filled())
        }))?
        .label(end_year.to_string())
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], END_COLOR.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_distribution(area: &Area<'_>, records: &[ChangeRecord], summary: &ChangeSummary) -> Result<()> {
    let changes: Vec<f64> = records.iter().map(ChangeRecord::change).collect();
    let (bins, hist_min, bin_width) = histogram(&changes, HISTOGRAM_BINS);
    let hist_max = hist_min + bin_width * HISTOGRAM_BINS as f64;
    let top = bins.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of NDVI Changes", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(hist_min..hist_max, 0.0..top)?;

    chart
        .configure_mesh()
        .x_desc("NDVI Change")
        .y_desc("Number of Points")
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    chart.draw_series(bins.iter().enumerate().map(|(i, &count)| {
        let x0 = hist_min + i as f64 * bin_width;
        let x1 = x0 + bin_width;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.mix(0.5).filled())
    }))?;

    chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (0.0, top)], BLACK.mix(0.6).stroke_width(1)))?;

    chart
        .draw_series(LineSeries::new(vec![(summary.mean, 0.0), (summary.mean, top)], RED.stroke_width(2)))?
        .label(format!("Mean: {:.3}", summary.mean))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], RED));

    chart
        .draw_series(LineSeries::new(
            vec![(summary.median, 0.0), (summary.median, top)],
            GREEN.stroke_width(2),
        ))?
        .label(format!("Median: {:.3}", summary.median))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Equal-width bins spanning the values and zero.
///
/// Returns the counts, the lower edge of the first bin, and the bin width.
fn histogram(values: &[f64], num_bins: usize) -> (Vec<u32>, f64, f64) {
    let low = values.iter().copied().fold(0.0f64, f64::min);
    let high = values.iter().copied().fold(0.0f64, f64::max);
    let pad = ((high - low) * 0.1).max(0.05);
    let hist_min = low - pad;
    let bin_width = (high + pad - hist_min) / num_bins as f64;

    let mut bins = vec![0u32; num_bins];
    for value in values {
        let idx = (((value - hist_min) / bin_width) as usize).min(num_bins - 1);
        bins[idx] += 1;
    }

    (bins, hist_min, bin_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::{record, record_at};
    use geode_analysis::summarize;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plot_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PLOT_FILE);
        let records = vec![record_at(-103.8, 44.1, -0.3), record(0.05), record_at(-103.2, 44.3, 0.2)];
        let summary = summarize(&records).unwrap();

        write_plot(&path, &records, &summary).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Distribution of NDVI Changes"));
        assert!(svg.contains(&format!("Mean: {:.3}", summary.mean)));
        assert!(svg.contains(&format!("Median: {:.3}", summary.median)));
    }

    #[test]
    fn test_plot_requires_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PLOT_FILE);
        let summary = summarize(&[record(0.1)]).unwrap();

        assert!(write_plot(&path, &[], &summary).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [-0.3, -0.1, 0.0, 0.05, 0.2, 0.2];
        let (bins, hist_min, bin_width) = histogram(&values, HISTOGRAM_BINS);

        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins.iter().sum::<u32>(), values.len() as u32);
        assert!(hist_min < -0.3);
        assert!(hist_min + bin_width * HISTOGRAM_BINS as f64 > 0.2);
    }

    #[test]
    fn test_histogram_of_identical_values() {
        let (bins, hist_min, bin_width) = histogram(&[0.0, 0.0], HISTOGRAM_BINS);

        assert!(bin_width > 0.0);
        assert!(hist_min < 0.0);
        assert_eq!(bins.iter().sum::<u32>(), 2);
    }
}
