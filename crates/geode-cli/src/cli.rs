use clap::{Parser, Subcommand};
use geode_core::config::{parse_concurrency, parse_timeout_secs};
use std::path::PathBuf;

/// Geode - Vegetation change detection from satellite imagery
#[derive(Parser, Debug)]
#[command(name = "geode")]
#[command(about = "Vegetation change detection over a polygon", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare vegetation index readings between two years
    Analyze(AnalyzeArgs),

    /// Sample points inside a polygon without querying imagery
    Sample(SampleArgs),

    /// Show the resolved configuration and where each value came from
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Region polygon: a GeoJSON file, or inline JSON such as '[[lon,lat],...]'
    #[arg(long, value_name = "FILE|JSON")]
    pub polygon: String,

    /// Baseline year
    #[arg(long)]
    pub start_year: i32,

    /// Comparison year
    #[arg(long)]
    pub end_year: i32,

    /// Number of sample points
    #[arg(long, default_value = "10", value_parser = points_arg)]
    pub points: usize,

    /// Directory for the report, map, and GeoJSON artifacts
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub run: RunOverrides,
}

#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Region polygon: a GeoJSON file, or inline JSON such as '[[lon,lat],...]'
    #[arg(long, value_name = "FILE|JSON")]
    pub polygon: String,

    /// Number of sample points
    #[arg(long, default_value = "10", value_parser = points_arg)]
    pub points: usize,

    /// Random seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub run: RunOverrides,
}

/// Per-invocation overrides of the layered configuration
#[derive(Parser, Debug, Default)]
pub struct RunOverrides {
    /// STAC API root URL
    #[arg(long, value_name = "URL")]
    pub catalog: Option<String>,

    /// Imagery collection to search
    #[arg(long)]
    pub collection: Option<String>,

    /// Per-query timeout in seconds
    #[arg(long, value_parser = timeout_arg)]
    pub timeout_secs: Option<u64>,

    /// Number of points queried at once
    #[arg(long, value_parser = concurrency_arg)]
    pub concurrency: Option<usize>,

    /// Random seed for sampling and simulated readings
    #[arg(long)]
    pub seed: Option<u64>,
}

fn timeout_arg(s: &str) -> Result<u64, String> {
    parse_timeout_secs(s).map_err(|e| e.to_string())
}

fn concurrency_arg(s: &str) -> Result<usize, String> {
    parse_concurrency(s).map_err(|e| e.to_string())
}

fn points_arg(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Number of points must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "geode",
            "analyze",
            "--polygon",
            "region.geojson",
            "--start-year",
            "2018",
            "--end-year",
            "2023",
            "--seed",
            "7",
            "--concurrency",
            "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.polygon, "region.geojson");
                assert_eq!(args.points, 10);
                assert_eq!(args.output_dir, PathBuf::from("output"));
                assert_eq!(args.run.seed, Some(7));
                assert_eq!(args.run.concurrency, Some(2));
                assert_eq!(args.run.timeout_secs, None);
            }
            other => panic!("Expected analyze, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = Cli::try_parse_from(["geode", "config", "--concurrency", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_points_rejected() {
        let analyze = Cli::try_parse_from([
            "geode",
            "analyze",
            "--polygon",
            "region.geojson",
            "--start-year",
            "2018",
            "--end-year",
            "2023",
            "--points",
            "0",
        ]);
        let err = analyze.unwrap_err().to_string();
        assert!(err.contains("Number of points must be at least 1"));

        let sample = Cli::try_parse_from(["geode", "sample", "--polygon", "region.geojson", "--points", "0"]);
        assert!(sample.is_err());

        let one = Cli::try_parse_from(["geode", "sample", "--polygon", "region.geojson", "--points", "1"]).unwrap();
        match one.command {
            Commands::Sample(args) => assert_eq!(args.points, 1),
            other => panic!("Expected sample, got {:?}", other),
        }
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["geode", "config", "--json"]).unwrap();
        assert!(cli.json);
    }
}
