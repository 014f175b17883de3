pub const SECONDS_PER_MINUTE: u32 = 60;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const HOURS_PER_DAY: u32 = 24;
pub const SECONDS_PER_HOUR: u32 = SECONDS_PER_MINUTE * MINUTES_PER_HOUR;
pub const SECONDS_PER_DAY: u32 = SECONDS_PER_HOUR * HOURS_PER_DAY;

pub const MILLILITRES_PER_GALLON: f64 = 3_785.411784;
pub const CUBIC_METRES_PER_GALLON: f64 = MILLILITRES_PER_GALLON / 1e6;
pub const MILLILITRES_PER_LITRE: f64 = 1_000.;
pub const METRES_PER_INCH: f64 = 0.0254;
pub const GPM_TO_LITRES_PER_SECOND: f64 =
    MILLILITRES_PER_GALLON / MILLILITRES_PER_LITRE / SECONDS_PER_MINUTE as f64;

/// Pattern timestep (tss), in seconds. Every schedule window and pattern
/// index in the crate is expressed in multiples of this.
pub const TIMESTEP_SECONDS: u32 = 10;
pub const STEPS_PER_MINUTE: usize = (SECONDS_PER_MINUTE / TIMESTEP_SECONDS) as usize;
pub const STEPS_PER_HOUR: usize = (SECONDS_PER_HOUR / TIMESTEP_SECONDS) as usize;
pub const STEPS_PER_DAY: usize = (SECONDS_PER_DAY / TIMESTEP_SECONDS) as usize;
