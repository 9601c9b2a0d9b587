//! # replay_core - Replay Telemetry Analysis Engine
//!
//! Derives player-performance metrics from a decoded real-time strategy
//! replay timeline and turns them into coaching advice.
//!
//! ## Features
//! - Supply blocks, spending quotient and inject cadence
//! - APM / effective APM and army value sampling
//! - Opening build order
//! - Prioritized suggestions and a loser vs. winner strategic report
//! - Metric trends across matches
//! - JSON output with a published JSON Schema

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod timeline;

pub use analysis::{
    analysis_result_schema, AnalysisCoordinator, AnalysisResult, CancellationToken,
    StrategicComparator, StrategicReport, Suggestion, TrendReport,
};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use timeline::{
    Faction, GameResult, MatchInfo, ParsedReplay, PlayerInfo, Timeline, TimelineEvent,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the serialized [`AnalysisResult`] layout
pub const SCHEMA_VERSION: u32 = 1;
