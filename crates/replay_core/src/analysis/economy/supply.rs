//! # Supply Block Detector
//!
//! Finds intervals where a player sat at their supply cap.
//!
//! ## Algorithm
//! 1. Scan the player's `PlayerStats` snapshots in order
//! 2. Open a block when `used >= max > 0` and none is open
//! 3. Close it on the first snapshot where the condition clears
//! 4. A block still open after the last snapshot ends at match duration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisContext, Analyzer};

/// Blocks shorter than this are `Low`.
pub const LOW_SEVERITY_MAX_SECS: f64 = 5.0;

/// Blocks shorter than this (and not `Low`) are `Medium`.
pub const MEDIUM_SEVERITY_MAX_SECS: f64 = 15.0;

/// Severity of a supply block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_duration(duration_secs: f64) -> Self {
        if duration_secs < LOW_SEVERITY_MAX_SECS {
            Severity::Low
        } else if duration_secs < MEDIUM_SEVERITY_MAX_SECS {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

/// One closed supply block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupplyBlock {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub severity: Severity,
    /// Supply used when the block started
    pub supply_used: i64,
    /// Supply cap when the block started
    pub supply_max: i64,
}

/// Supply at one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupplyPoint {
    pub time: f64,
    pub supply_used: i64,
    pub supply_max: i64,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupplyAnalysis {
    /// Seconds spent blocked
    pub total_block_time: f64,
    /// Share of the match spent blocked, 0-100
    pub block_percentage: f64,
    pub blocks: Vec<SupplyBlock>,
    pub supply_timeline: Vec<SupplyPoint>,
}

/// Block opened but not yet closed.
struct OpenBlock {
    start_time: f64,
    supply_used: i64,
    supply_max: i64,
}

impl OpenBlock {
    fn close(self, end_time: f64) -> SupplyBlock {
        let end_time = end_time.max(self.start_time);
        let duration = end_time - self.start_time;
        SupplyBlock {
            start_time: self.start_time,
            end_time,
            duration,
            severity: Severity::from_duration(duration),
            supply_used: self.supply_used,
            supply_max: self.supply_max,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SupplyBlockDetector;

impl Analyzer for SupplyBlockDetector {
    type Output = SupplyAnalysis;
    const NAME: &'static str = "supply";

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<SupplyAnalysis> {
        let mut blocks = Vec::new();
        let mut supply_timeline = Vec::new();
        let mut open: Option<OpenBlock> = None;

        for (evt, stats) in ctx.player_stats() {
            let time = evt.time_secs();
            let used = stats.supply_used();
            let max = stats.supply_max();
            let is_blocked = max > 0 && used >= max;

            supply_timeline.push(SupplyPoint {
                time,
                supply_used: used,
                supply_max: max,
                is_blocked,
            });

            match (is_blocked, open.take()) {
                (true, None) => {
                    open = Some(OpenBlock { start_time: time, supply_used: used, supply_max: max })
                }
                (true, Some(block)) => open = Some(block),
                (false, Some(block)) => blocks.push(block.close(time)),
                (false, None) => {}
            }
        }

        if supply_timeline.is_empty() {
            return None;
        }

        if let Some(block) = open {
            blocks.push(block.close(ctx.duration_secs));
        }

        let total_block_time: f64 = blocks.iter().map(|b| b.duration).sum();
        let block_percentage = if ctx.duration_secs > 0.0 {
            (total_block_time / ctx.duration_secs * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        debug!(
            player = ctx.player_id,
            blocks = blocks.len(),
            total_block_time,
            "supply analysis done"
        );

        Some(SupplyAnalysis { total_block_time, block_percentage, blocks, supply_timeline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::*;
    use crate::timeline::Faction;
    use proptest::prelude::*;

    fn analyze(
        events: Vec<crate::timeline::TimelineEvent>,
        duration: f64,
    ) -> Option<SupplyAnalysis> {
        let timeline = timeline(events, duration);
        SupplyBlockDetector.analyze(&context(&timeline, 1, Faction::Terran))
    }

    #[test]
    fn test_capped_then_released_is_one_medium_block() {
        let mut events: Vec<_> = (0..=10).map(|t| supply_event(t as f64, 1, 200, 200)).collect();
        events.push(supply_event(11.0, 1, 180, 400));

        let result = analyze(events, 600.0).unwrap();
        assert_eq!(result.blocks.len(), 1);
        let block = &result.blocks[0];
        assert_eq!(block.start_time, 0.0);
        assert_eq!(block.severity, Severity::Medium);
        assert_eq!(block.supply_used, 200);
        assert_eq!(block.supply_max, 200);
        assert!((block.duration - 11.0).abs() < 0.1);
        assert_eq!(result.supply_timeline.len(), 12);
        assert!(result.supply_timeline[10].is_blocked);
        assert!(!result.supply_timeline[11].is_blocked);
    }

    #[test]
    fn test_open_block_closes_at_match_end() {
        let events = vec![supply_event(10.0, 1, 14, 15), supply_event(100.0, 1, 15, 15)];
        let result = analyze(events, 130.0).unwrap();
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].end_time, 130.0);
        assert_eq!(result.blocks[0].severity, Severity::High);
        assert!((result.total_block_time - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_zero_cap_is_not_blocked() {
        let events = vec![supply_event(0.0, 1, 0, 0), supply_event(5.0, 1, 0, 0)];
        let result = analyze(events, 60.0).unwrap();
        assert!(result.blocks.is_empty());
        assert_eq!(result.block_percentage, 0.0);
    }

    #[test]
    fn test_other_player_ignored() {
        let events = vec![supply_event(0.0, 2, 15, 15), supply_event(30.0, 2, 10, 23)];
        assert!(analyze(events, 60.0).is_none());
    }

    #[test]
    fn test_severity_buckets() {
        assert_eq!(Severity::from_duration(0.0), Severity::Low);
        assert_eq!(Severity::from_duration(4.99), Severity::Low);
        assert_eq!(Severity::from_duration(5.0), Severity::Medium);
        assert_eq!(Severity::from_duration(14.99), Severity::Medium);
        assert_eq!(Severity::from_duration(15.0), Severity::High);
    }

    proptest! {
        #[test]
        fn prop_block_totals_consistent(series in arb_supply_series(), extra in 0.0f64..120.0) {
            let last = series.last().map(|s| s.0).unwrap_or(0.0);
            let duration = last + extra;
            let events = series
                .iter()
                .map(|&(t, used, max)| supply_event(t, 1, used, max))
                .collect();

            if let Some(result) = analyze(events, duration) {
                let sum: f64 = result.blocks.iter().map(|b| b.duration).sum();
                prop_assert!((sum - result.total_block_time).abs() < EPS);
                prop_assert!((0.0..=100.0).contains(&result.block_percentage));
                for pair in result.blocks.windows(2) {
                    prop_assert!(pair[0].end_time <= pair[1].start_time);
                }
                for block in &result.blocks {
                    prop_assert!(block.end_time >= block.start_time);
                }
            }
        }
    }
}
