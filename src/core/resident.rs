use crate::core::fixture::{FixtureKind, Step, TimeWindow};
use crate::core::household::FixtureSet;
use crate::core::schedule::{offset_into_day, RoutineEntry};
use crate::errors::PpmError;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The closed set of recognized routine actions. Each maps to one behavior
/// on one typed fixture collection; `food` and `sample` are recognized
/// placeholders reserved for future extension and perform no draw.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum Action {
    Shower,
    Drink,
    Teeth,
    Hands,
    Toilet,
    Food,
    Sample,
    Laundry,
    Lawn,
    Dishes,
    Ice,
    Humidify,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "shower" => Self::Shower,
            "drink" => Self::Drink,
            "teeth" => Self::Teeth,
            "hands" => Self::Hands,
            "toilet" => Self::Toilet,
            "food" => Self::Food,
            "sample" => Self::Sample,
            "laundry" => Self::Laundry,
            "lawn" => Self::Lawn,
            "dishes" => Self::Dishes,
            "ice" => Self::Ice,
            "humidify" => Self::Humidify,
            other => return Err(format!("unrecognized action name: {other}")),
        })
    }
}

impl TryFrom<String> for Action {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Shower => "shower",
            Self::Drink => "drink",
            Self::Teeth => "teeth",
            Self::Hands => "hands",
            Self::Toilet => "toilet",
            Self::Food => "food",
            Self::Sample => "sample",
            Self::Laundry => "laundry",
            Self::Lawn => "lawn",
            Self::Dishes => "dishes",
            Self::Ice => "ice",
            Self::Humidify => "humidify",
        };
        write!(f, "{label}")
    }
}

/// A household member with a per-day routine. Residents hold no back
/// reference to their household; fixture access is passed in at simulation
/// time so that the whole household clones cleanly between trials.
#[derive(Clone, Debug)]
pub struct Resident {
    name: String,
    routine: Vec<Vec<RoutineEntry>>,
}

impl Resident {
    pub fn new(name: &str, routine: Vec<Vec<RoutineEntry>>) -> Self {
        Self {
            name: name.to_string(),
            routine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routine_days(&self) -> usize {
        self.routine.len()
    }

    /// Build the randomized action queue for one day of the routine.
    ///
    /// For each routine entry, `frequency` start steps are drawn uniformly
    /// from the day part's feasible starts (those whose inclusive end still
    /// lies inside the day part), offset into the correct day. A duration no
    /// feasible start can accommodate fails immediately instead of looping.
    ///
    /// Queue order follows routine-definition order, not chronology; real
    /// conflicts are resolved per fixture when each action is performed.
    pub fn build_queue(
        &self,
        day: usize,
        rng: &mut Pcg64,
    ) -> Result<Vec<(Action, TimeWindow)>, PpmError> {
        let mut queue = vec![];
        for entry in &self.routine[day] {
            let feasible = entry.day_part().feasible_starts(entry.duration());
            if feasible.is_empty() {
                return Err(PpmError::SchedulingExhausted {
                    resident: self.name.clone(),
                    action: entry.action(),
                    day_part: entry.day_part(),
                    day,
                    duration: entry.duration(),
                });
            }
            for _ in 0..entry.frequency() {
                let start = feasible[rng.random_range(0..feasible.len())];
                queue.push((
                    entry.action(),
                    TimeWindow::from_duration(offset_into_day(start, day), entry.duration()),
                ));
            }
        }
        Ok(queue)
    }

    /// Perform this resident's routine for one day, dispatching each queued
    /// action to a randomly chosen fixture of the relevant kind.
    pub fn do_routine(
        &self,
        day: usize,
        fixtures: &mut FixtureSet,
        horizon: Step,
        rng: &mut Pcg64,
    ) -> Result<(), PpmError> {
        let queue = self.build_queue(day, rng)?;
        for (action, window) in queue {
            self.perform(action, window, day, fixtures, horizon, rng)?;
        }
        Ok(())
    }

    /// Dispatch one action: choose a fixture of the matching kind uniformly
    /// at random, resolve a conflict-free window via the fixture's own
    /// schedule, then invoke the fixture behavior.
    pub fn perform(
        &self,
        action: Action,
        window: TimeWindow,
        day: usize,
        fixtures: &mut FixtureSet,
        horizon: Step,
        rng: &mut Pcg64,
    ) -> Result<(), PpmError> {
        match action {
            Action::Drink => {
                self.run_water(action, FixtureKind::Faucet, "Drinking", 1., 0., window, day, fixtures, horizon, rng)
            }
            Action::Shower => {
                self.run_water(action, FixtureKind::Shower, "Shower", 0.2, 0.8, window, day, fixtures, horizon, rng)
            }
            Action::Teeth => {
                self.run_water(action, FixtureKind::Faucet, "Brush Teeth", 1., 0., window, day, fixtures, horizon, rng)
            }
            Action::Hands => {
                self.run_water(action, FixtureKind::Faucet, "Wash Hands", 0.5, 0.5, window, day, fixtures, horizon, rng)
            }
            Action::Lawn => {
                self.run_water(action, FixtureKind::Spigot, "Water Lawn", 1., 0., window, day, fixtures, horizon, rng)
            }
            Action::Ice => {
                self.run_water(action, FixtureKind::Fridge, "Ice", 1., 0., window, day, fixtures, horizon, rng)
            }
            Action::Humidify => self.run_water(
                action,
                FixtureKind::Humidifier,
                "Humidify",
                1.,
                0.,
                window,
                day,
                fixtures,
                horizon,
                rng,
            ),
            Action::Toilet => {
                let idx = self.choose(action, FixtureKind::Toilet, day, fixtures, rng)?;
                let fixture = fixtures.get_mut(idx);
                let window = fixture.available_times(window, horizon)?;
                fixture.flush_toilet(&self.name, window);
                Ok(())
            }
            Action::Dishes => {
                let idx = self.choose(action, FixtureKind::Dishwasher, day, fixtures, rng)?;
                let fixture = fixtures.get_mut(idx);
                let window = fixture.available_times(window, horizon)?;
                fixture.run_dishwasher("Dishes", &self.name, window);
                Ok(())
            }
            Action::Laundry => {
                let idx = self.choose(action, FixtureKind::Washer, day, fixtures, rng)?;
                let fixture = fixtures.get_mut(idx);
                let window = fixture.available_times(window, horizon)?;
                fixture.run_washer("Wash Clothes", &self.name, window, 0.5, 0.5);
                Ok(())
            }
            // placeholders, reserved but not implemented
            Action::Food | Action::Sample => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_water(
        &self,
        action: Action,
        kind: FixtureKind,
        note: &str,
        cold_fraction: f64,
        hot_fraction: f64,
        window: TimeWindow,
        day: usize,
        fixtures: &mut FixtureSet,
        horizon: Step,
        rng: &mut Pcg64,
    ) -> Result<(), PpmError> {
        let idx = self.choose(action, kind, day, fixtures, rng)?;
        let policy = fixtures.rate_policy();
        let fixture = fixtures.get_mut(idx);
        let window = fixture.available_times(window, horizon)?;
        fixture.run_water(note, &self.name, window, cold_fraction, hot_fraction, policy)
    }

    fn choose(
        &self,
        action: Action,
        kind: FixtureKind,
        day: usize,
        fixtures: &FixtureSet,
        rng: &mut Pcg64,
    ) -> Result<usize, PpmError> {
        fixtures
            .choose(kind, rng)
            .ok_or_else(|| PpmError::NoFixtureForAction {
                resident: self.name.clone(),
                action,
                wanted: kind,
                day,
            })
    }
}
