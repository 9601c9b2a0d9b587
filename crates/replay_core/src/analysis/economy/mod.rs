//! # Economy Analysis
//!
//! - `supply` - supply block intervals
//! - `spending` - unspent resources and Spending Quotient
//! - `inject` - Zerg inject cadence

pub mod inject;
pub mod spending;
pub mod supply;

pub use inject::{
    inject_efficiency, InjectAnalysis, InjectPoint, InjectTracker, MissedInjectWindow,
    INJECT_DURATION_SECS,
};
pub use spending::{
    spending_quotient, ResourcePoint, ResourceValue, SpendingAnalysis, SpendingAnalyzer,
    SpendingRating, SQ_MAX,
};
pub use supply::{Severity, SupplyAnalysis, SupplyBlock, SupplyBlockDetector, SupplyPoint};
