//! Analyze command implementation

use super::resolve_config;
use crate::artifacts::write_artifacts;
use crate::cli::AnalyzeArgs;
use crate::output::OutputWriter;
use crate::output_types::{short_date, AnalyzeOutput, ChangeRow};
use crate::progress::{create_spinner, finish_error, finish_success};
use crate::region_input::load_region;
use anyhow::{bail, Context, Result};
use geode_analysis::{summarize, ChangeAnalyzer, RunDiagnostics};
use geode_catalog::{CatalogObservationSource, SimulatedNdvi, StacClient};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

pub async fn execute(args: AnalyzeArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    if args.end_year <= args.start_year {
        bail!(
            "End year ({}) must be after start year ({})",
            args.end_year,
            args.start_year
        );
    }

    let region = load_region(&args.polygon)?;
    let config = resolve_config(config_path, &args.run)?;

    let catalog = StacClient::new(config.catalog_url.value.clone(), config.query_timeout())
        .context("Failed to create catalog client")?;
    let estimator = SimulatedNdvi::new(args.start_year, config.seed.value);
    let source = CatalogObservationSource::new(
        catalog,
        estimator,
        config.collection.value.clone(),
        config.query_timeout(),
    );

    let analyzer = ChangeAnalyzer::new(region, source).with_concurrency(config.concurrency.value);
    let mut rng = match config.seed.value {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tracing::info!(
        "Analyzing {} points between {} and {} using {}",
        args.points,
        args.start_year,
        args.end_year,
        config.catalog_url.value
    );

    let spinner = create_spinner(
        &format!("Querying {} imagery for {} points...", config.collection.value, args.points),
        output.is_json(),
    );

    let analysis = match analyzer.run(args.start_year, args.end_year, args.points, &mut rng).await {
        Ok(analysis) => analysis,
        Err(e) => {
            finish_error(&spinner, "Sampling failed");
            return Err(e).context("Could not place any sample points inside the polygon");
        }
    };

    if analysis.records.is_empty() {
        finish_error(&spinner, "No paired observations");
        report_diagnostics(&analysis.diagnostics, output);
        bail!(
            "No valid NDVI data found for any of the {} sampled points",
            analysis.diagnostics.sampled_points
        );
    }

    finish_success(
        &spinner,
        &format!(
            "Paired {} of {} points",
            analysis.diagnostics.paired_points, analysis.diagnostics.sampled_points
        ),
    );

    let summary = summarize(&analysis.records)?;
    let artifacts = write_artifacts(&args.output_dir, analyzer.region(), &analysis.records, &summary)?;

    report_diagnostics(&analysis.diagnostics, output);

    if output.is_json() {
        output.result(AnalyzeOutput {
            start_year: analysis.start_year,
            end_year: analysis.end_year,
            summary,
            diagnostics: analysis.diagnostics,
            artifacts,
        })?;
        return Ok(());
    }

    output.section("NDVI Change Analysis");
    output.kv(
        "Time Period",
        format!(
            "{} to {}",
            short_date(&summary.earliest_acquired),
            short_date(&summary.latest_acquired)
        ),
    );
    output.kv("Sample Points", summary.count);
    output.kv("Mean Change", format!("{:.3}", summary.mean));
    output.kv("Median Change", format!("{:.3}", summary.median));
    output.kv(
        "Standard Deviation",
        summary.std_dev.map_or_else(|| "n/a".to_string(), |s| format!("{:.3}", s)),
    );
    output.kv("Range", format!("{:.3} to {:.3}", summary.min, summary.max));
    output.kv(
        "Decreased",
        format!("{} ({:.1}%)", summary.decreased.count, summary.decreased.percent),
    );
    output.kv(
        "Increased",
        format!("{} ({:.1}%)", summary.increased.count, summary.increased.percent),
    );

    output.section("Significant Changes");
    output.table(summary.significant.iter().map(ChangeRow::from).collect());

    output.section("Artifacts");
    output.success(format!("Report: {}", artifacts.report));
    output.success(format!("Plot: {}", artifacts.plot));
    output.success(format!("Map: {}", artifacts.map));
    output.success(format!("GeoJSON: {}", artifacts.geojson));

    Ok(())
}

fn report_diagnostics(diagnostics: &RunDiagnostics, output: &OutputWriter) {
    if diagnostics.sampling_shortfall() > 0 {
        output.warning(format!(
            "Only {} of {} requested points fell inside the polygon after {} draws",
            diagnostics.sampled_points, diagnostics.requested_points, diagnostics.draws
        ));
    }

    if diagnostics.dropped_points > 0 {
        output.warning(format!(
            "{} points dropped: {} timeouts, {} without imagery, {} transport errors",
            diagnostics.dropped_points,
            diagnostics.timeouts(),
            diagnostics.start_misses.no_imagery + diagnostics.end_misses.no_imagery,
            diagnostics.start_misses.transport + diagnostics.end_misses.transport
        ));
    }
}
