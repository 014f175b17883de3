use crate::core::units::STEPS_PER_DAY;
use serde::Deserialize;

/// The simulated horizon. Patterns are discretized over
/// `days * STEPS_PER_DAY` timesteps; events scheduled beyond the horizon
/// are clamped by the pattern builder rather than rejected here.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SimulationTime {
    days: usize,
}

impl SimulationTime {
    pub fn new(days: usize) -> Self {
        Self { days }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// Number of pattern timesteps covered by the simulation.
    pub fn total_steps(&self) -> usize {
        self.days * STEPS_PER_DAY
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self { days: 7 }
    }
}
