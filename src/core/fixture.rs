use crate::core::units::STEPS_PER_MINUTE;
use crate::errors::PpmError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Index of a pattern timestep from the start of the simulation.
pub type Step = usize;

/// Flow rate the synthetic supply fixture is given, in gal/min. Large enough
/// never to constrain aggregate household demand.
pub(crate) const SOURCE_MAX_RATE: f64 = 1000.;

/// Number of one-minute flushes a toilet pipe rinse is decomposed into, at most.
const RINSE_FLUSH_COUNT: usize = 3;

const DISHWASHER_FILL_MINUTES: usize = 2;
const DISHWASHER_FILL_COUNT: usize = 2;
const WASHER_FILL_MINUTES: usize = 5;
const WASHER_FILL_COUNT: usize = 3;

/// An inclusive window of pattern timesteps: an event active over
/// `[start, end]` draws water during both endpoint steps.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: Step,
    pub end: Step,
}

impl TimeWindow {
    pub fn new(start: Step, end: Step) -> Self {
        debug_assert!(end >= start, "window end precedes start");
        Self { start, end }
    }

    /// Window starting at `start` and spanning `duration` whole steps.
    pub fn from_duration(start: Step, duration: usize) -> Self {
        debug_assert!(duration > 0, "zero-duration window");
        Self {
            start,
            end: start + duration - 1,
        }
    }

    pub fn duration(&self) -> usize {
        self.end - self.start + 1
    }

    /// Closed-interval overlap test, inclusive at both ends.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn shifted(&self, steps: usize) -> Self {
        Self {
            start: self.start + steps,
            end: self.end + steps,
        }
    }
}

/// One scheduled water draw at a fixture. Immutable once appended to a
/// fixture schedule; attribution is by name so that households stay
/// plainly cloneable.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub note: String,
    pub fixture: String,
    pub person: String,
    pub window: TimeWindow,
    pub cold_rate: f64,
    pub hot_rate: f64,
}

/// Hydraulic connection at a fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Cold,
    Hot,
}

/// Whether rate oversubscription (`cold + hot fractions > 1`) warns or rejects.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RatePolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum FixtureKind {
    Faucet,
    Shower,
    Toilet,
    Spigot,
    Fridge,
    Dishwasher,
    Washer,
    Humidifier,
    SamplePort,
    Source,
}

impl FromStr for FixtureKind {
    type Err = PpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "faucet" => Self::Faucet,
            "shower" => Self::Shower,
            "toilet" => Self::Toilet,
            "spigot" => Self::Spigot,
            "fridge" => Self::Fridge,
            "dishwasher" => Self::Dishwasher,
            "washer" => Self::Washer,
            "humidifier" => Self::Humidifier,
            // hws is the experimental-rig alias for a sampling port
            "sampleport" | "hws" => Self::SamplePort,
            "source" => Self::Source,
            other => return Err(PpmError::UnknownFixtureType(other.to_string())),
        })
    }
}

impl TryFrom<String> for FixtureKind {
    type Error = PpmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for FixtureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Faucet => "faucet",
            Self::Shower => "shower",
            Self::Toilet => "toilet",
            Self::Spigot => "spigot",
            Self::Fridge => "fridge",
            Self::Dishwasher => "dishwasher",
            Self::Washer => "washer",
            Self::Humidifier => "humidifier",
            Self::SamplePort => "sampleport",
            Self::Source => "source",
        };
        write!(f, "{label}")
    }
}

impl FixtureKind {
    fn nodes(&self) -> &'static [Node] {
        match self {
            Self::Faucet | Self::Shower | Self::Washer => &[Node::Cold, Node::Hot],
            Self::Dishwasher => &[Node::Hot],
            Self::Toilet
            | Self::Spigot
            | Self::Fridge
            | Self::Humidifier
            | Self::SamplePort
            | Self::Source => &[Node::Cold],
        }
    }

    fn continuously_flushable(&self) -> bool {
        matches!(self, Self::Faucet | Self::Shower | Self::Spigot | Self::Fridge)
    }
}

/// A household water outlet. One struct covers all variants; kind-specific
/// behavior (node labels, cycle decomposition, rinse strategy) dispatches on
/// the closed [`FixtureKind`] enum.
#[derive(Clone, Debug)]
pub struct Fixture {
    name: String,
    kind: FixtureKind,
    max_rate: f64,
    cycle_volume: Option<f64>,
    node_labels: Vec<String>,
    schedule: Vec<Event>,
}

impl Fixture {
    /// Construct a fixture.
    ///
    /// Arguments:
    /// * `kind` - fixture variant
    /// * `name` - unique fixture id; node labels derive from it
    /// * `rate_or_volume` - max flow rate in gal/min for continuously
    ///   metered kinds; for the cyclic dishwasher and washer this slot
    ///   carries the cycle volume in gallons and the max rate is derived
    ///   from it (volume/duration policy wins)
    pub fn new(kind: FixtureKind, name: &str, rate_or_volume: f64) -> Self {
        let (max_rate, cycle_volume) = match kind {
            FixtureKind::Dishwasher => (
                rate_or_volume / (DISHWASHER_FILL_COUNT * DISHWASHER_FILL_MINUTES) as f64,
                Some(rate_or_volume),
            ),
            FixtureKind::Washer => (
                rate_or_volume / (WASHER_FILL_COUNT * WASHER_FILL_MINUTES) as f64,
                Some(rate_or_volume),
            ),
            _ => (rate_or_volume, None),
        };
        let node_labels = match kind {
            FixtureKind::SamplePort => vec![format!("{name}_samp")],
            _ => kind
                .nodes()
                .iter()
                .map(|node| match node {
                    Node::Cold => format!("{name}C"),
                    Node::Hot => format!("{name}H"),
                })
                .collect(),
        };
        Self {
            name: name.to_string(),
            kind,
            max_rate,
            cycle_volume,
            node_labels,
            schedule: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FixtureKind {
        self.kind
    }

    pub fn max_rate(&self) -> f64 {
        self.max_rate
    }

    pub fn cycle_volume(&self) -> Option<f64> {
        self.cycle_volume
    }

    /// Hydraulic node identifiers this fixture maps to, stable for the
    /// fixture's lifetime and used as keys into the solver's node namespace.
    pub fn node_labels(&self) -> &[String] {
        &self.node_labels
    }

    /// Node label carrying draws on the given line, if the fixture has one.
    pub fn node_label(&self, node: Node) -> Option<&str> {
        self.kind
            .nodes()
            .iter()
            .position(|n| *n == node)
            .map(|idx| self.node_labels[idx].as_str())
    }

    pub fn continuous_flushability(&self) -> bool {
        self.kind.continuously_flushable()
    }

    pub fn schedule(&self) -> &[Event] {
        &self.schedule
    }

    /// Clear all accumulated water usage events.
    pub fn reset_schedule(&mut self) {
        self.schedule.clear();
    }

    /// Append a water usage event over `window`, drawing the given fractions
    /// of the max rate on the cold and hot lines.
    ///
    /// Fractions summing over 1 oversubscribe the fixture: under
    /// [`RatePolicy::Permissive`] this warns and the rates are computed as
    /// given (not clamped); under [`RatePolicy::Strict`] it is rejected.
    pub fn run_water(
        &mut self,
        note: &str,
        person: &str,
        window: TimeWindow,
        cold_fraction: f64,
        hot_fraction: f64,
        policy: RatePolicy,
    ) -> Result<(), PpmError> {
        if cold_fraction + hot_fraction > 1. {
            match policy {
                RatePolicy::Strict => {
                    return Err(PpmError::RateOversubscribed {
                        fixture: self.name.clone(),
                        cold_fraction,
                        hot_fraction,
                    });
                }
                RatePolicy::Permissive => {
                    warn!(
                        fixture = %self.name,
                        cold_fraction,
                        hot_fraction,
                        "cold + hot rates exceed max rate"
                    );
                }
            }
        }
        self.push_event(
            note,
            person,
            window,
            cold_fraction * self.max_rate,
            hot_fraction * self.max_rate,
        );
        Ok(())
    }

    /// Find the earliest window at or after `proposed` that does not overlap
    /// any scheduled event, advancing one step at a time and re-scanning the
    /// whole schedule after every shift. Sequential first-fit, not optimal
    /// packing: later-scheduled actions tend to be pushed later in the day.
    ///
    /// Fails with [`PpmError::ScheduleFull`] once the candidate start is
    /// pushed to or beyond `limit` (the simulation horizon, in steps).
    pub fn available_times(
        &self,
        proposed: TimeWindow,
        limit: Step,
    ) -> Result<TimeWindow, PpmError> {
        let mut window = proposed;
        let mut busy = true;
        while busy {
            busy = false;
            for event in &self.schedule {
                if window.overlaps(&event.window) {
                    window = window.shifted(1);
                    if window.start >= limit {
                        return Err(PpmError::ScheduleFull {
                            fixture: self.name.clone(),
                            limit,
                        });
                    }
                    busy = true;
                    break;
                }
            }
        }
        Ok(window)
    }

    /// Append a pipe-flushing event covering `[start_time, start_time + duration]`
    /// on the requested node at the fixture's maximum rate. Cyclic kinds
    /// cannot hold a continuous draw, so they decompose the window into a
    /// full operation cycle instead: the dishwasher and washer run one cycle,
    /// the toilet flushes up to three times.
    pub fn rinse_pipes(&mut self, start_time: Step, duration: usize, node: Node) {
        let window = TimeWindow::new(start_time, start_time + duration);
        let note = format!("Flush {}", self.name);
        match self.kind {
            FixtureKind::Dishwasher => self.run_dishwasher(&note, "Flusher", window),
            FixtureKind::Washer => self.run_washer(&note, "Flusher", window, 0.5, 0.5),
            FixtureKind::Toilet => {
                let flush_len = STEPS_PER_MINUTE;
                let flush_count = RINSE_FLUSH_COUNT.min(duration / flush_len);
                for i in 1..=flush_count {
                    let flush_window = TimeWindow::new(
                        start_time + flush_len * (i - 1),
                        start_time + flush_len * i - 1,
                    );
                    self.flush_toilet(&format!("Flusher-{i}"), flush_window);
                }
            }
            _ => {
                let (cold_rate, hot_rate) = match node {
                    Node::Cold => (self.max_rate, 0.),
                    Node::Hot => (0., self.max_rate),
                };
                self.push_event(&note, "Flusher", window, cold_rate, hot_rate);
            }
        }
    }

    /// Append one toilet flush cycle: cold water at the max (fill) rate over
    /// the whole window.
    pub fn flush_toilet(&mut self, person: &str, window: TimeWindow) {
        let note = format!("Toilet Flush {}", self.name);
        let max_rate = self.max_rate;
        self.push_event(&note, person, window, max_rate, 0.);
    }

    /// Append one dishwasher cycle filling `window` exactly: wash-fill, wash,
    /// rinse-fill, rinse. Fill phases draw hot water at the derived fill
    /// rate; soak phases draw nothing. Phase windows partition the requested
    /// window with no gaps and no overlaps.
    pub fn run_dishwasher(&mut self, note: &str, person: &str, window: TimeWindow) {
        let duration = window.duration();
        let fill_len = DISHWASHER_FILL_MINUTES * STEPS_PER_MINUTE;
        let half = duration / 2;
        let wash_fill = fill_len.min(half);
        let rinse_fill = fill_len.min(duration - half);
        let max_rate = self.max_rate;
        // dishwasher is hot only
        let phases = [
            ("wash-fill", wash_fill, max_rate),
            ("wash", half - wash_fill, 0.),
            ("rinse-fill", rinse_fill, max_rate),
            ("rinse", duration - half - rinse_fill, 0.),
        ];
        let mut start = window.start;
        for (phase, len, hot_rate) in phases {
            if len == 0 {
                continue;
            }
            let phase_window = TimeWindow::from_duration(start, len);
            self.push_event(&format!("{note}-{phase}"), person, phase_window, 0., hot_rate);
            start += len;
        }
    }

    /// Append one washer cycle filling `window` exactly: wash-fill, wash,
    /// rinse-fill, rinse, spin-spray, spin. The wash fill uses the caller's
    /// cold/hot split; the rinse fill and spin spray are cold only.
    pub fn run_washer(
        &mut self,
        note: &str,
        person: &str,
        window: TimeWindow,
        cold_fraction: f64,
        hot_fraction: f64,
    ) {
        let duration = window.duration();
        let fill_len = WASHER_FILL_MINUTES * STEPS_PER_MINUTE;
        let third = duration / 3;
        let last = duration - 2 * third;
        let wash_fill = fill_len.min(third);
        let rinse_fill = fill_len.min(third);
        let spin_spray = fill_len.min(last);
        let max_rate = self.max_rate;
        let phases = [
            (
                "wash-fill",
                wash_fill,
                (cold_fraction * max_rate, hot_fraction * max_rate),
            ),
            ("wash", third - wash_fill, (0., 0.)),
            ("rinse-fill", rinse_fill, (max_rate, 0.)),
            ("rinse", third - rinse_fill, (0., 0.)),
            ("spin-spray", spin_spray, (max_rate, 0.)),
            ("spin", last - spin_spray, (0., 0.)),
        ];
        let mut start = window.start;
        for (phase, len, (cold_rate, hot_rate)) in phases {
            if len == 0 {
                continue;
            }
            let phase_window = TimeWindow::from_duration(start, len);
            self.push_event(&format!("{note}-{phase}"), person, phase_window, cold_rate, hot_rate);
            start += len;
        }
    }

    fn push_event(
        &mut self,
        note: &str,
        person: &str,
        window: TimeWindow,
        cold_rate: f64,
        hot_rate: f64,
    ) {
        self.schedule.push(Event {
            note: note.to_string(),
            fixture: self.name.clone(),
            person: person.to_string(),
            window,
            cold_rate,
            hot_rate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use rstest::*;

    #[fixture]
    fn faucet() -> Fixture {
        Fixture::new(FixtureKind::Faucet, "F1", 2.0)
    }

    #[rstest]
    fn should_derive_node_labels_per_kind() {
        assert_eq!(
            Fixture::new(FixtureKind::Shower, "SH1", 2.5).node_labels(),
            ["SH1C", "SH1H"]
        );
        assert_eq!(
            Fixture::new(FixtureKind::Dishwasher, "DW1", 6.0).node_labels(),
            ["DW1H"]
        );
        assert_eq!(
            Fixture::new(FixtureKind::Toilet, "TOL1", 3.0).node_labels(),
            ["TOL1C"]
        );
        assert_eq!(
            Fixture::new(FixtureKind::SamplePort, "SPS", 1.0).node_labels(),
            ["SPS_samp"]
        );
    }

    #[rstest]
    fn should_derive_cyclic_max_rate_from_cycle_volume() {
        let dishwasher = Fixture::new(FixtureKind::Dishwasher, "DW1", 6.0);
        assert_eq!(dishwasher.max_rate(), 1.5);
        assert_eq!(dishwasher.cycle_volume(), Some(6.0));
        let washer = Fixture::new(FixtureKind::Washer, "WA1", 30.0);
        assert_eq!(washer.max_rate(), 2.0);
    }

    #[rstest]
    fn should_parse_fixture_kind_labels_case_insensitively() {
        assert_eq!("Faucet".parse::<FixtureKind>().unwrap(), FixtureKind::Faucet);
        assert_eq!("HWS".parse::<FixtureKind>().unwrap(), FixtureKind::SamplePort);
        assert_eq!(
            "sampleport".parse::<FixtureKind>().unwrap(),
            FixtureKind::SamplePort
        );
        assert!("bidet".parse::<FixtureKind>().is_err());
    }

    #[rstest]
    fn should_compute_rates_from_fractions(mut faucet: Fixture) {
        faucet
            .run_water(
                "Wash Hands",
                "P1",
                TimeWindow::new(10, 15),
                0.5,
                0.25,
                RatePolicy::Permissive,
            )
            .unwrap();
        let event = &faucet.schedule()[0];
        assert_eq!(event.cold_rate, 1.0);
        assert_eq!(event.hot_rate, 0.5);
        assert_eq!(event.window, TimeWindow::new(10, 15));
    }

    #[rstest]
    fn should_reject_oversubscription_under_strict_policy(mut faucet: Fixture) {
        let result = faucet.run_water(
            "Drinking",
            "P1",
            TimeWindow::new(0, 5),
            0.8,
            0.8,
            RatePolicy::Strict,
        );
        assert!(matches!(result, Err(PpmError::RateOversubscribed { .. })));
        assert!(faucet.schedule().is_empty());
    }

    #[rstest]
    fn should_warn_but_keep_uncapped_rates_under_permissive_policy(mut faucet: Fixture) {
        faucet
            .run_water(
                "Drinking",
                "P1",
                TimeWindow::new(0, 5),
                0.8,
                0.8,
                RatePolicy::Permissive,
            )
            .unwrap();
        // rates are computed from the fractions as given, not clamped
        assert_eq!(faucet.schedule()[0].cold_rate, 1.6);
        assert_eq!(faucet.schedule()[0].hot_rate, 1.6);
    }

    #[rstest]
    fn should_shift_proposed_window_past_conflicts(mut faucet: Fixture) {
        faucet
            .run_water(
                "Shower",
                "P1",
                TimeWindow::new(10, 20),
                1.,
                0.,
                RatePolicy::Permissive,
            )
            .unwrap();
        let window = faucet
            .available_times(TimeWindow::new(8, 12), 1000)
            .unwrap();
        assert_eq!(window, TimeWindow::new(21, 25));
    }

    #[rstest]
    fn should_treat_shared_endpoint_as_conflict(mut faucet: Fixture) {
        faucet
            .run_water(
                "Shower",
                "P1",
                TimeWindow::new(10, 20),
                1.,
                0.,
                RatePolicy::Permissive,
            )
            .unwrap();
        // closed-interval test: [20, 25] touches [10, 20] at step 20
        let window = faucet
            .available_times(TimeWindow::new(20, 25), 1000)
            .unwrap();
        assert_eq!(window, TimeWindow::new(21, 26));
    }

    #[rstest]
    fn should_fail_when_no_window_fits_before_limit(mut faucet: Fixture) {
        faucet
            .run_water(
                "Shower",
                "P1",
                TimeWindow::new(0, 99),
                1.,
                0.,
                RatePolicy::Permissive,
            )
            .unwrap();
        let result = faucet.available_times(TimeWindow::new(0, 5), 100);
        assert!(matches!(result, Err(PpmError::ScheduleFull { limit: 100, .. })));
    }

    /// Property: whatever the proposal, the returned window never overlaps a
    /// scheduled event.
    #[rstest]
    fn available_window_never_overlaps_schedule() {
        let mut rng = Pcg64::seed_from_u64(1837);
        let mut faucet = Fixture::new(FixtureKind::Faucet, "F1", 2.0);
        for _ in 0..40 {
            let start = rng.random_range(0..5_000);
            let duration = rng.random_range(1..60);
            let proposed = TimeWindow::from_duration(start, duration);
            let window = faucet.available_times(proposed, 100_000).unwrap();
            assert!(window.start >= proposed.start);
            assert_eq!(window.duration(), proposed.duration());
            for event in faucet.schedule() {
                assert!(
                    !window.overlaps(&event.window),
                    "window {window:?} overlaps scheduled {:?}",
                    event.window
                );
            }
            faucet
                .run_water("fuzz", "P1", window, 1., 0., RatePolicy::Permissive)
                .unwrap();
        }
    }

    #[rstest]
    fn dishwasher_cycle_partitions_window_exactly() {
        let mut dishwasher = Fixture::new(FixtureKind::Dishwasher, "DW1", 6.0);
        dishwasher.run_dishwasher("Dishes", "P1", TimeWindow::new(0, 239));

        let schedule = dishwasher.schedule();
        assert_eq!(schedule.len(), 4);
        assert_eq!(
            schedule.iter().map(|e| e.note.as_str()).collect::<Vec<_>>(),
            [
                "Dishes-wash-fill",
                "Dishes-wash",
                "Dishes-rinse-fill",
                "Dishes-rinse"
            ]
        );
        // no gaps, no overlaps, durations sum to the full window
        assert_eq!(schedule[0].window, TimeWindow::new(0, 11));
        assert_eq!(schedule[1].window, TimeWindow::new(12, 119));
        assert_eq!(schedule[2].window, TimeWindow::new(120, 131));
        assert_eq!(schedule[3].window, TimeWindow::new(132, 239));
        assert_eq!(
            schedule.iter().map(|e| e.window.duration()).sum::<usize>(),
            240
        );
        // fills draw hot only at the derived rate; soaks draw nothing
        assert_eq!(schedule[0].hot_rate, 1.5);
        assert_eq!(schedule[0].cold_rate, 0.);
        assert_eq!(schedule[1].hot_rate, 0.);
        assert_eq!(schedule[2].hot_rate, 1.5);
        assert_eq!(schedule[3].hot_rate, 0.);
    }

    #[rstest]
    fn washer_cycle_partitions_window_and_splits_rates() {
        let mut washer = Fixture::new(FixtureKind::Washer, "WA1", 30.0);
        washer.run_washer("Wash Clothes", "P1", TimeWindow::new(0, 359), 0.5, 0.5);

        let schedule = washer.schedule();
        assert_eq!(schedule.len(), 6);
        assert_eq!(
            schedule.iter().map(|e| e.window.duration()).sum::<usize>(),
            360
        );
        let mut expected_start = 0;
        for event in schedule {
            assert_eq!(event.window.start, expected_start);
            expected_start = event.window.end + 1;
        }
        // wash fill uses the caller's split, rinse fill and spin spray are cold only
        assert_eq!(schedule[0].cold_rate, 1.0);
        assert_eq!(schedule[0].hot_rate, 1.0);
        assert_eq!(schedule[2].cold_rate, 2.0);
        assert_eq!(schedule[2].hot_rate, 0.);
        assert_eq!(schedule[4].cold_rate, 2.0);
        assert_eq!(schedule[4].hot_rate, 0.);
    }

    #[rstest]
    fn toilet_rinse_decomposes_into_bounded_flush_count() {
        let mut toilet = Fixture::new(FixtureKind::Toilet, "TOL1", 3.0);
        // 5 minutes of requested flushing caps at 3 one-minute flushes
        toilet.rinse_pipes(100, 5 * STEPS_PER_MINUTE, Node::Cold);
        let schedule = toilet.schedule();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].window, TimeWindow::new(100, 105));
        assert_eq!(schedule[1].window, TimeWindow::new(106, 111));
        assert_eq!(schedule[2].window, TimeWindow::new(112, 117));
        assert_eq!(schedule[0].person, "Flusher-1");
        for event in schedule {
            assert_eq!(event.cold_rate, 3.0);
            assert_eq!(event.hot_rate, 0.);
        }
    }

    #[rstest]
    fn continuous_rinse_draws_max_rate_on_requested_node(mut faucet: Fixture) {
        faucet.rinse_pipes(50, 30, Node::Hot);
        let event = &faucet.schedule()[0];
        assert_eq!(event.window, TimeWindow::new(50, 80));
        assert_eq!(event.cold_rate, 0.);
        assert_eq!(event.hot_rate, 2.0);
        assert_eq!(event.person, "Flusher");
        assert_eq!(event.note, "Flush F1");
    }

    #[rstest]
    fn reset_schedule_clears_events(mut faucet: Fixture) {
        faucet
            .run_water("Drinking", "P1", TimeWindow::new(0, 5), 1., 0., RatePolicy::Permissive)
            .unwrap();
        assert_eq!(faucet.schedule().len(), 1);
        faucet.reset_schedule();
        assert!(faucet.schedule().is_empty());
    }
}
