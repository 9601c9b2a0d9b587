//! # Mechanics Analysis
//!
//! - `apm` - actions per minute and effective APM
//! - `army` - army value samples and final composition

pub mod apm;
pub mod army;

pub use apm::{ApmAggregator, ApmAnalysis, ApmPoint, APM_WINDOW_SECS, EAPM_MIN_TICKS_BETWEEN};
pub use army::{ArmyAnalysis, ArmyPoint, ArmySampler, UnitCount, ARMY_SAMPLE_INTERVAL_SECS};
