pub mod fixture;
pub mod household;
pub mod pattern;
pub mod resident;
pub mod schedule;
pub mod units;
