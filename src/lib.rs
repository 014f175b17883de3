pub mod core;
pub mod errors;
pub mod input;
pub mod monte_carlo;
pub mod output;
mod simulation_time;
pub mod solver;

pub use crate::simulation_time::SimulationTime;

use crate::input::ingest_for_processing;
use crate::monte_carlo::{run_monte_carlo, MonteCarloRun};
use crate::output::Output;
use csv::WriterBuilder;
use indexmap::IndexMap;
use std::io::Read;
use tracing::info;

/// Run a whole project: ingest and validate the configuration, generate
/// every monte-carlo trial, and write the solver-facing artifacts (one
/// pattern CSV per trial and scenario, the replayable event list, and the
/// run matrix).
pub fn run_project(input: impl Read, output: impl Output) -> Result<(), anyhow::Error> {
    let input = ingest_for_processing(input)?;
    let run = run_monte_carlo(&input)?;
    info!(
        name = %run.name,
        seed = run.seed,
        trials = run.trials.len(),
        cases = run.cases.len(),
        "generation complete"
    );
    if output.is_noop() {
        return Ok(());
    }
    write_artifacts(&run, &output)
}

fn write_artifacts(run: &MonteCarloRun, output: &impl Output) -> anyhow::Result<()> {
    for trial in &run.trials {
        for (scenario, patterns) in &trial.scenarios {
            let location = format!(
                "{}/{}_patterns.csv",
                trial.trial_id,
                scenario.replace(' ', "_")
            );
            write_pattern_csv(output.writer_for_location_key(&location)?, &patterns.patterns)?;
        }
    }

    let events_location = format!("{}_events.json", run.name);
    let events_writer = output.writer_for_location_key(&events_location)?;
    serde_json::to_writer_pretty(events_writer, &run.event_artifact())?;

    let matrix_location = format!("{}_run_matrix.csv", run.name);
    let mut matrix =
        WriterBuilder::new().from_writer(output.writer_for_location_key(&matrix_location)?);
    matrix.write_record([
        "num_people",
        "scenario",
        "hwh_volume",
        "pipe_diam",
        "pipe_scaling",
        "path",
    ])?;
    for case in &run.cases {
        matrix.write_record([
            case.num_people.to_string(),
            case.scenario.clone(),
            case.hwh_volume.to_string(),
            case.pipe_diam.to_string(),
            case.pipe_scaling.to_string(),
            case.relative_path().display().to_string(),
        ])?;
    }
    matrix.flush()?;
    Ok(())
}

/// One row per timestep, one column per node pattern, in pattern-map order.
fn write_pattern_csv(
    writer: impl std::io::Write,
    patterns: &IndexMap<String, Vec<f64>>,
) -> anyhow::Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    let mut header = vec!["step".to_string()];
    header.extend(patterns.keys().cloned());
    csv_writer.write_record(&header)?;

    let steps = patterns.values().map(Vec::len).next().unwrap_or_default();
    for step in 0..steps {
        let mut record = vec![step.to_string()];
        record.extend(patterns.values().map(|pattern| pattern[step].to_string()));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}
