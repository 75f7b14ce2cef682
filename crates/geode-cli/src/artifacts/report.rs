use chrono::Datelike;
use geode_core::models::ChangeSummary;

pub const REPORT_FILE: &str = "ndvi_statistics.txt";

/// Plain-text statistics report
pub fn render_report(summary: &ChangeSummary) -> String {
    let std_dev = summary.std_dev.map_or_else(|| "n/a".to_string(), |s| format!("{:.3}", s));

    format!(
        "NDVI Change Analysis Summary
============================
Time Period: {start} - {end}
Number of Sample Points: {count}

Change Statistics:
------------------
Mean Change: {mean:.3}
Median Change: {median:.3}
Standard Deviation: {std_dev}
Range: {min:.3} to {max:.3}

Points with Decrease: {decreased} ({decreased_pct:.1}%)
Points with Increase: {increased} ({increased_pct:.1}%)

Significant Changes:
--------------------
{table}
",
        start = summary.earliest_acquired.year(),
        end = summary.latest_acquired.year(),
        count = summary.count,
        mean = summary.mean,
        median = summary.median,
        std_dev = std_dev,
        min = summary.min,
        max = summary.max,
        decreased = summary.decreased.count,
        decreased_pct = summary.decreased.percent,
        increased = summary.increased.count,
        increased_pct = summary.increased.percent,
        table = significant_table(summary),
    )
}

fn significant_table(summary: &ChangeSummary) -> String {
    if summary.significant.is_empty() {
        return "(none)".to_string();
    }

    let header = format!(
        "{:>11} {:>10} {:>10} {:>10} {:>8} {:>12} {:>12}",
        "longitude", "latitude", "start", "end", "change", "start_date", "end_date"
    );
    let rows = summary.significant.iter().map(|record| {
        format!(
            "{:>11.4} {:>10.4} {:>10.3} {:>10.3} {:>8.3} {:>12} {:>12}",
            record.point().lon,
            record.point().lat,
            record.start_index(),
            record.end_index(),
            record.change(),
            record.start_acquired().format("%Y-%m-%d"),
            record.end_acquired().format("%Y-%m-%d"),
        )
    });

    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}
