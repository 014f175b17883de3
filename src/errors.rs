use crate::core::fixture::FixtureKind;
use crate::core::resident::Action;
use crate::core::schedule::DayPart;
use thiserror::Error;

/// Error taxonomy for the schedule generator. Configuration problems are
/// surfaced before any randomized generation begins; scheduling problems
/// identify the offending resident, action and day.
#[derive(Debug, Error)]
pub enum PpmError {
    #[error("unrecognized fixture type label: {0}")]
    UnknownFixtureType(String),
    #[error("routine is missing required key: {0}")]
    MissingRoutineKey(&'static str),
    #[error("routine for {resident} covers {routine_days} days but the modeled week has {week_days}")]
    RoutineLengthMismatch {
        resident: String,
        routine_days: usize,
        week_days: usize,
    },
    #[error("{resident} has no {wanted} fixture for action '{action}' on day {day}")]
    NoFixtureForAction {
        resident: String,
        action: Action,
        wanted: FixtureKind,
        day: usize,
    },
    #[error(
        "cannot place action '{action}' for {resident} on day {day}: \
         duration {duration} steps does not fit within day part {day_part}"
    )]
    SchedulingExhausted {
        resident: String,
        action: Action,
        day_part: DayPart,
        day: usize,
        duration: usize,
    },
    #[error("no conflict-free window on {fixture} before the end of the horizon (step {limit})")]
    ScheduleFull { fixture: String, limit: usize },
    #[error(
        "cold fraction {cold_fraction} + hot fraction {hot_fraction} exceed the max rate of {fixture}"
    )]
    RateOversubscribed {
        fixture: String,
        cold_fraction: f64,
        hot_fraction: f64,
    },
    #[error("scenario '{scenario}' does not redefine fixture '{fixture}' from the reference scenario")]
    ScenarioFixtureMismatch { scenario: String, fixture: String },
}
