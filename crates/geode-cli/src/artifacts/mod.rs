//! Analysis artifacts written to the output directory

mod features;
mod map;
mod plot;
mod report;

use crate::output_types::ArtifactPaths;
use anyhow::{Context, Result};
use geode_core::models::{ChangeRecord, ChangeSummary};
use geode_geo::Region;
use std::fs;
use std::path::{Path, PathBuf};

use features::{changes_collection, GEOJSON_FILE};
use map::{render_map, MAP_FILE};
use plot::{write_plot, PLOT_FILE};
use report::{render_report, REPORT_FILE};

/// Write the report, plot, map and GeoJSON artifacts into `output_dir`
pub fn write_artifacts(
    output_dir: &Path,
    region: &Region,
    records: &[ChangeRecord],
    summary: &ChangeSummary,
) -> Result<ArtifactPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let report = write_file(output_dir, REPORT_FILE, &render_report(summary))?;
    let plot = output_dir.join(PLOT_FILE);
    write_plot(&plot, records, summary).with_context(|| format!("Failed to write {}", plot.display()))?;
    let map = write_file(output_dir, MAP_FILE, &render_map(region, records)?)?;
    let geojson = write_file(output_dir, GEOJSON_FILE, &changes_collection(region, records).to_string())?;

    tracing::info!("Wrote artifacts to {}", output_dir.display());

    Ok(ArtifactPaths {
        report: report.display().to_string(),
        plot: plot.display().to_string(),
        map: map.display().to_string(),
        geojson: geojson.display().to_string(),
    })
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
