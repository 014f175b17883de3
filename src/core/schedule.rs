use crate::core::fixture::Step;
use crate::core::resident::Action;
use crate::core::units::{STEPS_PER_DAY, STEPS_PER_HOUR};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A named recurring sub-interval of a day bounding when an action may
/// start. Spans are in whole hours and compile to discrete step sets.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum DayPart {
    AllDay,
    Day,
    Day2,
    Am,
    Pm,
    AmPm,
}

impl DayPart {
    pub fn hour_spans(&self) -> &'static [(u32, u32)] {
        match self {
            Self::AllDay => &[(0, 24)],
            Self::Day => &[(8, 16)],
            Self::Day2 => &[(6, 22)],
            Self::Am => &[(6, 8)],
            Self::Pm => &[(17, 22)],
            Self::AmPm => &[(6, 8), (17, 22)],
        }
    }

    /// The valid step set within a single day, ascending.
    pub fn steps(&self) -> Vec<Step> {
        self.hour_spans()
            .iter()
            .flat_map(|(start, end)| {
                (*start as usize * STEPS_PER_HOUR)..(*end as usize * STEPS_PER_HOUR)
            })
            .collect()
    }

    /// Start steps from which an action of `duration` steps ends inside the
    /// valid step set. Empty when the duration exceeds every span.
    pub(crate) fn feasible_starts(&self, duration: usize) -> Vec<Step> {
        debug_assert!(duration > 0);
        let steps = self.steps();
        steps
            .iter()
            .copied()
            .filter(|start| steps.binary_search(&(start + duration - 1)).is_ok())
            .collect()
    }
}

impl FromStr for DayPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "all_day" => Self::AllDay,
            "day" => Self::Day,
            "day2" => Self::Day2,
            "am" => Self::Am,
            "pm" => Self::Pm,
            "am_pm" => Self::AmPm,
            other => return Err(format!("unrecognized day part label: {other}")),
        })
    }
}

impl TryFrom<String> for DayPart {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for DayPart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::AllDay => "all_day",
            Self::Day => "day",
            Self::Day2 => "day2",
            Self::Am => "AM",
            Self::Pm => "PM",
            Self::AmPm => "AM_PM",
        };
        write!(f, "{label}")
    }
}

/// One routine task: action, day part it may start in, number of repetitions
/// per day, and duration in steps. Deserializes from the configuration's
/// tuple form, e.g. `["toilet", "AM", 2, 5]`.
#[derive(Clone, Debug, Deserialize)]
pub struct RoutineEntry(pub Action, pub DayPart, pub u32, pub usize);

impl RoutineEntry {
    pub fn action(&self) -> Action {
        self.0
    }

    pub fn day_part(&self) -> DayPart {
        self.1
    }

    pub fn frequency(&self) -> u32 {
        self.2
    }

    pub fn duration(&self) -> usize {
        self.3
    }
}

/// Day-type label in a modeled week.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum DayType {
    #[serde(rename = "wd")]
    Weekday,
    #[serde(rename = "we")]
    Weekend,
}

/// Default modeled week: Monday start, five weekdays then the weekend.
pub const DEFAULT_WEEK: [DayType; 7] = [
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekday,
    DayType::Weekend,
    DayType::Weekend,
];

/// Expand weekday/weekend routines across the modeled week for a resident.
pub fn week_routine_person(
    days_in_week: &[DayType],
    weekday: &[RoutineEntry],
    weekend: &[RoutineEntry],
) -> Vec<Vec<RoutineEntry>> {
    days_in_week
        .iter()
        .map(|day| match day {
            DayType::Weekday => weekday.to_vec(),
            DayType::Weekend => weekend.to_vec(),
        })
        .collect()
}

/// Expand a household routine across the modeled week: household actions
/// (lawn watering and the like) run on weekend days only.
pub fn week_routine_home(
    days_in_week: &[DayType],
    home_routine: &[RoutineEntry],
) -> Vec<Vec<RoutineEntry>> {
    days_in_week
        .iter()
        .map(|day| match day {
            DayType::Weekday => vec![],
            DayType::Weekend => home_routine.to_vec(),
        })
        .collect()
}

/// Offset a within-day step to the absolute simulation step for `day`.
pub(crate) fn offset_into_day(step: Step, day: usize) -> Step {
    step + day * STEPS_PER_DAY
}
