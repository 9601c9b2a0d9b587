//! # Analysis Module
//!
//! Per-player passes over a decoded match timeline, plus the head-to-head
//! comparison built on top of their results.
//!
//! ## Submodules
//!
//! - `economy` - supply blocks, spending quotient, inject cadence
//! - `mechanics` - APM/EAPM and army value sampling
//! - `build_order` - chronological build log for the opening
//! - `suggestions` - threshold rules turning results into coaching advice
//! - `coordinator` - runs every analyzer for a player and assembles the result
//! - `strategic` - loser vs. winner comparison report
//! - `trends` - metric trends across several matches
//!
//! Every leaf analyzer is a pure single pass over an immutable [`Timeline`]
//! behind the [`Analyzer`] trait, so the coordinator can fan them out.

pub mod build_order;
pub mod coordinator;
pub mod economy;
pub mod mechanics;
pub mod result;
pub mod strategic;
pub mod suggestions;
pub mod trends;

#[cfg(test)]
pub(crate) mod test_support;

use crate::timeline::{EventKind, Faction, PlayerStats, Timeline, TimelineEvent};

pub use build_order::{BuildAction, BuildOrderExtractor, BuildOrderItem};
pub use coordinator::{AnalysisCoordinator, CancellationToken, PlayerMetrics};
pub use economy::{
    InjectAnalysis, InjectPoint, InjectTracker, MissedInjectWindow, ResourcePoint, ResourceValue,
    Severity, SpendingAnalysis, SpendingAnalyzer, SpendingRating, SupplyAnalysis, SupplyBlock,
    SupplyBlockDetector, SupplyPoint,
};
pub use mechanics::{
    ApmAggregator, ApmAnalysis, ApmPoint, ArmyAnalysis, ArmyPoint, ArmySampler, UnitCount,
};
pub use result::{analysis_result_schema, AnalysisResult, Category, Priority, Suggestion};
pub use strategic::{
    CriticalMoment, IdentifiedProblem, ImprovementStep, MatchSide, MetricComparison, ProblemKind,
    StrategicComparator, StrategicReport, SupplyBlockSummary, TradeAssessment,
};
pub use suggestions::SuggestionEngine;
pub use trends::{MatchSample, Trend, TrendDirection, TrendPoint, TrendReport};

/// Everything an analyzer needs to know about the player under analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub timeline: &'a Timeline,
    /// 1-based player slot
    pub player_id: u32,
    pub faction: Faction,
    /// Authoritative match duration in real-time seconds
    pub duration_secs: f64,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        timeline: &'a Timeline,
        player_id: u32,
        faction: Faction,
        duration_secs: f64,
    ) -> Self {
        Self { timeline, player_id, faction, duration_secs }
    }

    /// The player's `PlayerStats` snapshots, in timeline order.
    pub fn player_stats(&self) -> impl Iterator<Item = (&'a TimelineEvent, &'a PlayerStats)> {
        let player_id = self.player_id;
        self.timeline.events.iter().filter_map(move |evt| {
            if evt.kind != EventKind::PlayerStats || evt.player_id != Some(player_id) {
                return None;
            }
            evt.stats().map(|stats| (evt, stats))
        })
    }

    /// The player's countable commands, in timeline order.
    pub fn player_actions(&self) -> impl Iterator<Item = &'a TimelineEvent> {
        let player_id = self.player_id;
        self.timeline
            .events
            .iter()
            .filter(move |evt| evt.kind.is_countable_action() && evt.player_id == Some(player_id))
    }
}

/// A single-pass, read-only analysis of one player's timeline.
pub trait Analyzer {
    type Output;

    /// Name used in logs.
    const NAME: &'static str;

    /// `None` when the player has none of the events this analyzer reads.
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Self::Output>;
}
