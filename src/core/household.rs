use crate::core::fixture::{
    Event, Fixture, FixtureKind, RatePolicy, Step, TimeWindow, SOURCE_MAX_RATE,
};
use crate::core::resident::Resident;
use crate::errors::PpmError;
use indexmap::IndexMap;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Denormalized form of one scheduled event, used for the persisted
/// per-trial artifact and for cross-scenario rescaling.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EventRecord {
    pub window: TimeWindow,
    pub fixture: String,
    pub person: String,
    pub hot_rate: f64,
    pub cold_rate: f64,
    pub note: String,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self {
            window: event.window,
            fixture: event.fixture.clone(),
            person: event.person.clone(),
            hot_rate: event.hot_rate,
            cold_rate: event.cold_rate,
            note: event.note.clone(),
        }
    }
}

/// All fixtures of a household, partitioned by kind for biased random
/// selection. Indices into one owned `Vec` rather than shared pointers, so
/// a plain clone yields the structurally independent copy each trial needs.
#[derive(Clone, Debug)]
pub struct FixtureSet {
    fixtures: Vec<Fixture>,
    by_kind: IndexMap<FixtureKind, Vec<usize>>,
    rate_policy: RatePolicy,
}

impl FixtureSet {
    fn new(rate_policy: RatePolicy) -> Self {
        Self {
            fixtures: vec![],
            by_kind: IndexMap::new(),
            rate_policy,
        }
    }

    fn push(&mut self, fixture: Fixture) {
        let idx = self.fixtures.len();
        self.by_kind.entry(fixture.kind()).or_default().push(idx);
        self.fixtures.push(fixture);
    }

    pub fn all(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn get(&self, idx: usize) -> &Fixture {
        &self.fixtures[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Fixture {
        &mut self.fixtures[idx]
    }

    pub fn of_kind(&self, kind: FixtureKind) -> &[usize] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Uniformly random fixture of the given kind, or None when the typed
    /// collection is empty.
    pub fn choose(&self, kind: FixtureKind, rng: &mut Pcg64) -> Option<usize> {
        let indices = self.of_kind(kind);
        if indices.is_empty() {
            return None;
        }
        Some(indices[rng.random_range(0..indices.len())])
    }

    pub fn rate_policy(&self) -> RatePolicy {
        self.rate_policy
    }
}

/// A modeled household: fixtures, residents, and (after simulation) the
/// aggregated chronological-by-fixture event list. Constructed once per
/// configuration; each trial clones it rather than resetting in place,
/// since fixture schedules accumulate state.
#[derive(Clone, Debug)]
pub struct Household {
    name: String,
    fixtures: FixtureSet,
    residents: Vec<Resident>,
    events: Vec<EventRecord>,
}

impl Household {
    /// Build a household from a fixture-definition list of
    /// (kind, name, max rate or cycle volume) entries. A synthetic `Source`
    /// fixture representing the supply connection is always appended.
    pub fn new<'a>(
        name: &str,
        model: impl IntoIterator<Item = (FixtureKind, &'a str, f64)>,
        rate_policy: RatePolicy,
    ) -> Self {
        let mut fixtures = FixtureSet::new(rate_policy);
        for (kind, fixture_name, rate) in model {
            fixtures.push(Fixture::new(kind, fixture_name, rate));
        }
        fixtures.push(Fixture::new(FixtureKind::Source, "Source", SOURCE_MAX_RATE));
        Self {
            name: name.to_string(),
            fixtures,
            residents: vec![],
            events: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixtures(&self) -> &[Fixture] {
        self.fixtures.all()
    }

    pub fn fixture_set(&self) -> &FixtureSet {
        &self.fixtures
    }

    pub(crate) fn fixture_set_mut(&mut self) -> &mut FixtureSet {
        &mut self.fixtures
    }

    pub fn source(&self) -> &Fixture {
        // the synthetic source is always the last fixture pushed
        self.fixtures
            .of_kind(FixtureKind::Source)
            .first()
            .map(|idx| self.fixtures.get(*idx))
            .expect("household always holds a source fixture")
    }

    pub fn add_resident(&mut self, resident: Resident) {
        self.residents.push(resident);
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    /// Drive every resident's routine across the modeled week, then gather
    /// all fixture schedules into the household event list.
    ///
    /// `horizon` bounds conflict resolution: an action that cannot be placed
    /// before that step fails the trial.
    pub fn simulate_usage(&mut self, horizon: Step, rng: &mut Pcg64) -> Result<(), PpmError> {
        let days = self
            .residents
            .iter()
            .map(Resident::routine_days)
            .max()
            .unwrap_or(0);
        for day in 0..days {
            for resident in &self.residents {
                if day < resident.routine_days() {
                    resident.do_routine(day, &mut self.fixtures, horizon, rng)?;
                }
            }
        }
        self.build_event_list();
        Ok(())
    }

    /// Flatten every fixture schedule into the denormalized event list.
    fn build_event_list(&mut self) {
        self.events = self
            .fixtures
            .all()
            .iter()
            .flat_map(|fixture| fixture.schedule().iter().map(EventRecord::from))
            .collect();
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Clear all accumulated schedules and the aggregated event list.
    pub fn reset_schedules(&mut self) {
        for fixture in self.fixtures.fixtures.iter_mut() {
            fixture.reset_schedule();
        }
        self.events.clear();
    }
}
