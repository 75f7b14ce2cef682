//! Sample command implementation

use crate::cli::SampleArgs;
use crate::output::OutputWriter;
use crate::output_types::{PointRow, SampleOutput};
use crate::region_input::load_region;
use anyhow::Result;
use geode_geo::Sampler;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn execute(args: SampleArgs, output: &OutputWriter) -> Result<()> {
    let region = load_region(&args.polygon)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let run = Sampler::new(&region).generate_default(args.points, &mut rng);

    if run.is_short() {
        output.warning(format!(
            "Only {} of {} requested points fell inside the polygon after {} draws",
            run.points.len(),
            run.requested,
            run.draws
        ));
    }

    if output.is_json() {
        return output.result(SampleOutput {
            requested: run.requested,
            draws: run.draws,
            points: run.points,
        });
    }

    output.section("Sample Points");
    output.kv("Region Area", format!("{:.4} sq. degrees", region.area()));
    output.kv("Draws", run.draws);
    output.table(
        run.points
            .iter()
            .enumerate()
            .map(|(i, p)| PointRow {
                index: i + 1,
                lon: format!("{:.5}", p.lon),
                lat: format!("{:.5}", p.lat),
            })
            .collect(),
    );

    Ok(())
}
