//! # Timeline Module
//!
//! Input model handed over by the replay decoder.
//!
//! - `event` - typed timeline events with a fallback payload bag
//! - `replay` - match metadata, factions and the timeline container
//!
//! ## Time base
//! The decoder counts game loops. At the "Faster" game speed there are 16
//! loops per game second and game time runs 1.4× real time, so
//! `real_seconds = tick / 16 / 1.4`. This is fixed, not configurable.

pub mod event;
pub mod replay;

pub use event::{
    CommandInfo, EventData, EventKind, EventStream, Payload, PayloadValue, PlayerStats,
    TimelineEvent, UnitLifecycle, FIXED_POINT_SCALE,
};
pub use replay::{Faction, GameResult, MatchInfo, ParsedReplay, PlayerInfo, Timeline};

/// Game loops per game second
pub const LOOPS_PER_GAME_SECOND: f64 = 16.0;

/// Game seconds per real second at "Faster"
pub const GAME_SPEED_FACTOR: f64 = 1.4;

/// Convert a game loop to real-time seconds.
#[inline]
pub fn ticks_to_seconds(tick: u32) -> f64 {
    tick as f64 / LOOPS_PER_GAME_SECOND / GAME_SPEED_FACTOR
}

/// Convert real-time seconds to the nearest game loop.
#[inline]
pub fn seconds_to_ticks(seconds: f64) -> u32 {
    (seconds * LOOPS_PER_GAME_SECOND * GAME_SPEED_FACTOR).round().max(0.0) as u32
}
