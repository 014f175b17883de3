use crate::core::fixture::FixtureKind;
use crate::core::household::{EventRecord, Household};
use crate::core::pattern::{build_pattern_map, pattern_key, source_pattern_key, sum_into_source};
use crate::core::resident::Resident;
use crate::core::schedule::{week_routine_home, week_routine_person};
use crate::errors::PpmError;
use crate::input::{FixtureDef, Input};
use anyhow::anyhow;
use indexmap::IndexMap;
use itertools::Itertools;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Per-node flow patterns for one trial under one fixture-flow scenario,
/// together with the event list they were compiled from.
#[derive(Clone, Debug)]
pub struct ScenarioPatterns {
    pub events: Vec<EventRecord>,
    pub patterns: IndexMap<String, Vec<f64>>,
}

/// One randomized trial of one household size. The reference scenario is
/// simulated; sibling fixture-flow scenarios are rescalings of it, so every
/// scenario of a trial shares event timing and differs only in rates.
#[derive(Clone, Debug)]
pub struct TrialArtifact {
    pub trial_id: String,
    pub num_people: usize,
    pub trial: usize,
    pub scenarios: IndexMap<String, ScenarioPatterns>,
}

/// One cell of the scenario cross product, addressing a solver run
/// directory. Hot-water-heater volume, pipe diameter and pipe length
/// scaling vary the downstream network, not the generated patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct RunCase {
    pub num_people: usize,
    pub scenario: String,
    pub hwh_volume: f64,
    pub pipe_diam: f64,
    pub pipe_scaling: f64,
}

impl RunCase {
    /// Relative directory for this case's solver runs, e.g.
    /// `2_People/low_flow/50-0_gal/0-75_in/1-0x`.
    pub fn relative_path(&self) -> PathBuf {
        [
            format!("{}_People", self.num_people),
            self.scenario.replace(' ', "_"),
            format!("{}_gal", path_number(self.hwh_volume)),
            format!("{}_in", path_number(self.pipe_diam)),
            format!("{}x", path_number(self.pipe_scaling)),
        ]
        .iter()
        .collect()
    }
}

fn path_number(value: f64) -> String {
    format!("{value:?}").replace('.', "-")
}

/// Everything one generation run produces: the seed it can be replayed
/// from, every trial's per-scenario patterns, and the solver run matrix.
#[derive(Clone, Debug)]
pub struct MonteCarloRun {
    pub name: String,
    pub seed: u64,
    pub trials: Vec<TrialArtifact>,
    pub cases: Vec<RunCase>,
}

impl MonteCarloRun {
    /// The persisted event artifact: trial id to the reference-scenario
    /// event list it can be re-derived from.
    pub fn event_artifact(&self) -> IndexMap<&str, &[EventRecord]> {
        self.trials
            .iter()
            .filter_map(|trial| {
                trial
                    .scenarios
                    .first()
                    .map(|(_, scenario)| (trial.trial_id.as_str(), scenario.events.as_slice()))
            })
            .collect()
    }
}

/// Run the full generation: for every household size, `num_trials`
/// independent randomized trials of the reference fixture-flow scenario,
/// each rescaled to every sibling scenario, crossed with the network axes
/// into the solver run matrix.
///
/// Trials are generated in parallel; determinism is preserved by deriving
/// each trial's own generator from the base seed and the trial's position
/// in the matrix.
pub fn run_monte_carlo(input: &Input) -> anyhow::Result<MonteCarloRun> {
    let seed = input.seed.unwrap_or_else(rand::random);
    info!(name = %input.name, seed, "starting monte carlo generation");

    let scenarios = input.fixtures.as_scenarios();
    let (&_, &reference) = scenarios
        .first()
        .ok_or_else(|| anyhow!("no fixture scenarios"))?;

    let trial_specs = input
        .changes
        .num_people
        .iter()
        .cartesian_product(0..input.num_trials)
        .enumerate()
        .map(|(stream, (&num_people, trial))| (num_people, trial, seed.wrapping_add(stream as u64)))
        .collect_vec();

    let horizon = input.simulation_time.total_steps();
    let trials = trial_specs
        .par_iter()
        .map(|&(num_people, trial, trial_seed)| {
            run_trial(input, reference, &scenarios, num_people, trial, trial_seed, horizon)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let cases = input
        .changes
        .num_people
        .iter()
        .cartesian_product(scenarios.keys())
        .cartesian_product(&input.changes.hwh_volume)
        .cartesian_product(&input.changes.pipe_diam)
        .cartesian_product(&input.changes.pipe_scaling)
        .map(
            |((((&num_people, scenario), &hwh_volume), &pipe_diam), &pipe_scaling)| RunCase {
                num_people,
                scenario: scenario.to_string(),
                hwh_volume,
                pipe_diam,
                pipe_scaling,
            },
        )
        .collect_vec();

    Ok(MonteCarloRun {
        name: input.name.clone(),
        seed,
        trials,
        cases,
    })
}

fn run_trial(
    input: &Input,
    reference: &[FixtureDef],
    scenarios: &IndexMap<&str, &[FixtureDef]>,
    num_people: usize,
    trial: usize,
    trial_seed: u64,
    horizon: usize,
) -> anyhow::Result<TrialArtifact> {
    let mut household = build_reference_household(input, reference, num_people)?;
    let trial_id = format!("{}-{trial}", household.name());
    let mut rng = Pcg64::seed_from_u64(trial_seed);
    household.simulate_usage(horizon, &mut rng)?;

    let reference_events = household.events().to_vec();
    let reference_patterns = build_pattern_map(&household, horizon);
    let source_key = source_pattern_key(&household);

    let mut outputs = IndexMap::new();
    for (scenario_idx, (&scenario_name, &defs)) in scenarios.iter().enumerate() {
        let output = if scenario_idx == 0 {
            ScenarioPatterns {
                events: reference_events.clone(),
                patterns: reference_patterns.clone(),
            }
        } else {
            rescale_scenario(
                &household,
                &reference_events,
                &reference_patterns,
                reference,
                defs,
                &source_key,
            )
        };
        outputs.insert(scenario_name.to_string(), output);
    }

    Ok(TrialArtifact {
        trial_id,
        num_people,
        trial,
        scenarios: outputs,
    })
}

/// Build the household a trial simulates: the reference scenario's fixtures
/// plus residents `P1..Pn` running the configured weekday/weekend routine
/// over the modeled week, and the fictitious `Home` resident when a
/// household routine is configured.
fn build_reference_household(
    input: &Input,
    reference: &[FixtureDef],
    num_people: usize,
) -> Result<Household, PpmError> {
    let mut household = Household::new(
        &format!("{}-P{num_people}_model", input.name),
        reference
            .iter()
            .map(|def| (def.kind(), def.name(), def.rate())),
        input.rate_policy,
    );
    let week = input.modeled_week();
    let (weekday, weekend) = input.week_routines();
    for person in 1..=num_people {
        household.add_resident(Resident::new(
            &format!("P{person}"),
            week_routine_person(&week, weekday, weekend),
        ));
    }
    if let Some(home_routine) = &input.household_routine {
        household.add_resident(Resident::new(
            "Home",
            week_routine_home(&week, home_routine),
        ));
    }
    for resident in household.residents() {
        if resident.routine_days() != input.simulation_time.days() {
            return Err(PpmError::RoutineLengthMismatch {
                resident: resident.name().to_string(),
                routine_days: resident.routine_days(),
                week_days: input.simulation_time.days(),
            });
        }
    }
    Ok(household)
}

/// Rescale the reference trial to a sibling fixture-flow scenario: each
/// fixture's events and node patterns are multiplied by the ratio of its
/// scenario rate to its reference rate, then the source pattern is rebuilt
/// as the column sum so supply still matches aggregate demand.
fn rescale_scenario(
    household: &Household,
    reference_events: &[EventRecord],
    reference_patterns: &IndexMap<String, Vec<f64>>,
    reference: &[FixtureDef],
    defs: &[FixtureDef],
    source_key: &str,
) -> ScenarioPatterns {
    let factors: IndexMap<&str, f64> = reference
        .iter()
        .zip(defs)
        .map(|(reference_def, def)| (reference_def.name(), def.rate() / reference_def.rate()))
        .collect();

    let events = reference_events
        .iter()
        .map(|event| {
            let factor = factors.get(event.fixture.as_str()).copied().unwrap_or(1.);
            EventRecord {
                hot_rate: event.hot_rate * factor,
                cold_rate: event.cold_rate * factor,
                ..event.clone()
            }
        })
        .collect();

    let mut patterns = reference_patterns.clone();
    for fixture in household.fixtures() {
        if fixture.kind() == FixtureKind::Source {
            continue;
        }
        let Some(&factor) = factors.get(fixture.name()) else {
            continue;
        };
        for node_label in fixture.node_labels() {
            if let Some(pattern) = patterns.get_mut(&pattern_key(node_label)) {
                for value in pattern {
                    *value *= factor;
                }
            }
        }
    }
    sum_into_source(&mut patterns, source_key);

    ScenarioPatterns { events, patterns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ingest_for_processing;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;
    use std::path::Path;

    fn sample_input() -> Input {
        let config = json!({
            "name": "MC",
            "simulation_time": {"days": 7},
            "num_trials": 2,
            "seed": 1837,
            "fixtures": {
                "standard": [
                    ["faucet", "F1", 2.0],
                    ["shower", "SH1", 2.5],
                    ["toilet", "TOL1", 3.0]
                ],
                "low flow": [
                    ["faucet", "F1", 1.0],
                    ["shower", "SH1", 1.25],
                    ["toilet", "TOL1", 1.5]
                ]
            },
            "routine": {
                "weekday": [
                    ["shower", "AM", 1, 90],
                    ["toilet", "AM_PM", 3, 6],
                    ["hands", "all_day", 4, 6]
                ],
                "weekend": [["drink", "all_day", 4, 3]]
            },
            "household_routine": [["toilet", "day", 1, 6]],
            "changes": {
                "num people": [1, 2],
                "hwh volume": [50.0],
                "pipe diam": [0.75, 1.0],
                "pipe scaling": [1.0]
            }
        });
        ingest_for_processing(config.to_string().as_bytes()).unwrap()
    }

    #[rstest]
    fn trial_matrix_covers_people_and_trials() {
        let run = run_monte_carlo(&sample_input()).unwrap();
        assert_eq!(run.seed, 1837);
        assert_eq!(run.trials.len(), 4);
        assert_eq!(
            run.trials
                .iter()
                .map(|trial| trial.trial_id.as_str())
                .collect::<Vec<_>>(),
            [
                "MC-P1_model-0",
                "MC-P1_model-1",
                "MC-P2_model-0",
                "MC-P2_model-1"
            ]
        );
        for trial in &run.trials {
            assert_eq!(
                trial.scenarios.keys().collect::<Vec<_>>(),
                ["standard", "low flow"]
            );
        }
    }

    #[rstest]
    fn run_matrix_crosses_every_network_axis() {
        let run = run_monte_carlo(&sample_input()).unwrap();
        // 2 people x 2 scenarios x 1 volume x 2 diameters x 1 scaling
        assert_eq!(run.cases.len(), 8);
        assert_eq!(
            run.cases[0].relative_path(),
            Path::new("1_People/standard/50-0_gal/0-75_in/1-0x")
        );
        assert_eq!(
            run.cases[7].relative_path(),
            Path::new("2_People/low_flow/50-0_gal/1-0_in/1-0x")
        );
    }

    #[rstest]
    fn same_seed_reproduces_the_same_trials() {
        let first = run_monte_carlo(&sample_input()).unwrap();
        let second = run_monte_carlo(&sample_input()).unwrap();
        for (a, b) in first.trials.iter().zip(&second.trials) {
            assert_eq!(a.trial_id, b.trial_id);
            assert_eq!(
                a.scenarios["standard"].events,
                b.scenarios["standard"].events
            );
            assert_eq!(
                a.scenarios["low flow"].patterns,
                b.scenarios["low flow"].patterns
            );
        }
    }

    #[rstest]
    fn sibling_scenario_is_an_exact_rescaling() {
        let run = run_monte_carlo(&sample_input()).unwrap();
        let trial = &run.trials[0];
        let standard = &trial.scenarios["standard"];
        let low_flow = &trial.scenarios["low flow"];

        // same event timing, rates scaled per fixture
        for (reference, scaled) in standard.events.iter().zip(&low_flow.events) {
            assert_eq!(reference.window, scaled.window);
            assert_eq!(reference.fixture, scaled.fixture);
            let factor = match reference.fixture.as_str() {
                "F1" => 0.5,
                "SH1" => 0.5,
                "TOL1" => 0.5,
                "Source" => 1.,
                other => panic!("unexpected fixture {other}"),
            };
            assert_relative_eq!(scaled.cold_rate, reference.cold_rate * factor);
            assert_relative_eq!(scaled.hot_rate, reference.hot_rate * factor);
        }

        // node patterns scale by the same factor, source re-sums
        for (key, pattern) in &standard.patterns {
            if key == "SourceCP" {
                continue;
            }
            let scaled = &low_flow.patterns[key];
            for (a, b) in pattern.iter().zip(scaled) {
                assert_relative_eq!(*b, a * 0.5);
            }
        }
        let horizon = pattern_horizon(&low_flow.patterns);
        for step in 0..horizon {
            let demand: f64 = low_flow
                .patterns
                .iter()
                .filter(|(key, _)| key.as_str() != "SourceCP")
                .map(|(_, pattern)| pattern[step])
                .sum();
            assert_relative_eq!(low_flow.patterns["SourceCP"][step], demand);
        }
    }

    #[rstest]
    fn home_resident_runs_the_household_routine() {
        let run = run_monte_carlo(&sample_input()).unwrap();
        let events = &run.trials[0].scenarios["standard"].events;
        assert!(events.iter().any(|event| event.person == "Home"));
    }

    #[rstest]
    fn event_artifact_indexes_reference_events_by_trial_id() {
        let run = run_monte_carlo(&sample_input()).unwrap();
        let artifact = run.event_artifact();
        assert_eq!(artifact.len(), 4);
        assert_eq!(
            artifact["MC-P1_model-0"],
            run.trials[0].scenarios["standard"].events.as_slice()
        );
    }

    #[rstest]
    fn routine_length_must_match_the_simulated_days() {
        let config = json!({
            "name": "MC",
            "simulation_time": {"days": 3},
            "fixtures": [["faucet", "F1", 2.0]],
            "routine": [["drink", "all_day", 2, 3]],
            "changes": {
                "num people": [1],
                "hwh volume": [50.0],
                "pipe diam": [0.75],
                "pipe scaling": [1.0]
            }
        });
        let input = ingest_for_processing(config.to_string().as_bytes()).unwrap();
        let error = run_monte_carlo(&input).unwrap_err();
        assert!(error
            .downcast_ref::<PpmError>()
            .is_some_and(|e| matches!(e, PpmError::RoutineLengthMismatch { .. })));
    }

    fn pattern_horizon(patterns: &IndexMap<String, Vec<f64>>) -> usize {
        patterns.values().map(Vec::len).next().unwrap_or_default()
    }
}
