// crates/gcb-core/src/stats/mod.rs
//
// C3: histogram-based thresholding with always-on LED detection.

pub mod alwayson;
pub mod hist;

pub use hist::{InstanceStats, PerLedStat, LUM_RANGE};
