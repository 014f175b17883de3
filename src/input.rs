use crate::core::fixture::{FixtureKind, RatePolicy};
use crate::core::schedule::{DayType, RoutineEntry, DEFAULT_WEEK};
use crate::errors::PpmError;
use crate::simulation_time::SimulationTime;
use anyhow::bail;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::io::Read;
use tracing::info;

/// Parse and validate a scenario configuration. All configuration problems
/// (unknown fixture labels, missing routine keys, inconsistent scenarios)
/// surface here, before any randomized generation begins.
pub fn ingest_for_processing(json: impl Read) -> anyhow::Result<Input> {
    let input: Input = serde_json::from_reader(json)?;
    input.validate()?;
    if matches!(input.routine, RoutineInput::Bare(_)) {
        info!("assuming the weekday routine repeats for all days");
    }
    Ok(input)
}

pub(crate) const REFERENCE_SCENARIO_NAME: &str = "single case";

fn default_num_trials() -> usize {
    1
}

fn default_num_people() -> Vec<usize> {
    vec![2]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    pub name: String,
    #[serde(default)]
    pub simulation_time: SimulationTime,
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,
    /// Seed for the generator; omitted means a fresh random seed, reported
    /// so the run can be replayed.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rate_policy: RatePolicy,
    pub fixtures: FixtureInfo,
    pub routine: RoutineInput,
    /// Whole-household actions (lawn watering and the like), performed by a
    /// fictitious resident named `Home` on weekend days.
    #[serde(default)]
    pub household_routine: Option<Vec<RoutineEntry>>,
    pub changes: Changes,
}

/// One fixture definition in the configuration's tuple form:
/// `["toilet", "TOL1", 3.0]` (type label, name, max rate or cycle volume).
#[derive(Clone, Debug, Deserialize)]
pub struct FixtureDef(pub FixtureKind, pub String, pub f64);

impl FixtureDef {
    pub fn kind(&self) -> FixtureKind {
        self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }

    pub fn rate(&self) -> f64 {
        self.2
    }
}

/// Either a single fixture-definition list or a map of named fixture-flow
/// scenarios sharing the same fixture layout at different rates.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FixtureInfo {
    Scenarios(IndexMap<String, Vec<FixtureDef>>),
    Single(Vec<FixtureDef>),
}

impl FixtureInfo {
    /// Normalize to named scenarios; a bare list becomes the single
    /// reference scenario.
    pub fn as_scenarios(&self) -> IndexMap<&str, &[FixtureDef]> {
        match self {
            Self::Scenarios(scenarios) => scenarios
                .iter()
                .map(|(name, defs)| (name.as_str(), defs.as_slice()))
                .collect(),
            Self::Single(defs) => {
                IndexMap::from([(REFERENCE_SCENARIO_NAME, defs.as_slice())])
            }
        }
    }
}

/// Weekday/weekend routine with an optional modeled week, or a bare routine
/// list interpreted as the same routine every day of the default week.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoutineInput {
    Weekly(WeeklyRoutine),
    Bare(Vec<RoutineEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklyRoutine {
    pub weekday: Option<Vec<RoutineEntry>>,
    pub weekend: Option<Vec<RoutineEntry>>,
    #[serde(rename = "modeled week")]
    pub modeled_week: Option<Vec<DayType>>,
}

/// The scenario cross-product axes. Hot-water-heater volume, pipe diameter
/// and pipe length scaling only affect the solver-side network, not the
/// generated patterns, but they multiply the run matrix.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Changes {
    #[serde(rename = "num people", default = "default_num_people")]
    pub num_people: Vec<usize>,
    #[serde(rename = "hwh volume")]
    pub hwh_volume: Vec<f64>,
    #[serde(rename = "pipe diam")]
    pub pipe_diam: Vec<f64>,
    #[serde(rename = "pipe scaling")]
    pub pipe_scaling: Vec<f64>,
}

impl Input {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_trials == 0 {
            bail!("num_trials must be at least 1");
        }
        if let RoutineInput::Weekly(weekly) = &self.routine {
            if weekly.weekday.is_none() {
                return Err(PpmError::MissingRoutineKey("weekday").into());
            }
            if weekly.weekend.is_none() {
                return Err(PpmError::MissingRoutineKey("weekend").into());
            }
            if let Some(week) = &weekly.modeled_week {
                if week.is_empty() {
                    bail!("modeled week must name at least one day");
                }
            }
        }
        let (weekday, weekend) = self.week_routines();
        for entry in weekday.iter().chain(weekend).chain(
            self.household_routine
                .as_deref()
                .unwrap_or_default(),
        ) {
            if entry.duration() == 0 {
                bail!(
                    "routine entry for action '{}' has a zero duration",
                    entry.action()
                );
            }
            if entry.frequency() == 0 {
                bail!(
                    "routine entry for action '{}' has a zero frequency",
                    entry.action()
                );
            }
        }

        let scenarios = self.fixtures.as_scenarios();
        let Some((&reference_name, &reference)) = scenarios.first() else {
            bail!("at least one fixture scenario is required");
        };
        if reference.is_empty() {
            bail!("fixture scenario '{reference_name}' defines no fixtures");
        }
        for (name, defs) in &scenarios {
            let mut seen = IndexSet::new();
            for def in *defs {
                if def.rate() <= 0. {
                    bail!(
                        "fixture '{}' in scenario '{name}' has non-positive rate {}",
                        def.name(),
                        def.rate()
                    );
                }
                // names are unique ids: node labels derive from them
                if !seen.insert(def.name()) {
                    bail!("fixture '{}' is defined twice in scenario '{name}'", def.name());
                }
            }
            // sibling scenarios rescale the reference trial per fixture, so
            // every scenario must redefine the same fixtures in order
            for (reference_def, def) in reference.iter().zip(*defs) {
                if def.name() != reference_def.name() || def.kind() != reference_def.kind() {
                    return Err(PpmError::ScenarioFixtureMismatch {
                        scenario: name.to_string(),
                        fixture: reference_def.name().to_string(),
                    }
                    .into());
                }
            }
            if defs.len() != reference.len() {
                return Err(PpmError::ScenarioFixtureMismatch {
                    scenario: name.to_string(),
                    fixture: format!("expected {} fixtures", reference.len()),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn modeled_week(&self) -> Vec<DayType> {
        match &self.routine {
            RoutineInput::Weekly(WeeklyRoutine {
                modeled_week: Some(week),
                ..
            }) => week.clone(),
            _ => DEFAULT_WEEK.to_vec(),
        }
    }

    /// The weekday and weekend routine lists. A bare routine list is used
    /// for every day of the week.
    pub fn week_routines(&self) -> (&[RoutineEntry], &[RoutineEntry]) {
        match &self.routine {
            RoutineInput::Weekly(weekly) => (
                weekly.weekday.as_deref().unwrap_or(&[]),
                weekly.weekend.as_deref().unwrap_or(&[]),
            ),
            RoutineInput::Bare(routine) => (routine, routine),
        }
    }
}
