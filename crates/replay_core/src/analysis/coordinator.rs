//! # Analysis Coordinator
//!
//! Runs every leaf analyzer for a player and assembles the
//! [`AnalysisResult`].
//!
//! ## Scheduling
//! The six analyzers are independent read-only passes. With
//! `config.parallel` they are fanned out through nested `rayon::join`
//! calls, otherwise they run one after another. Both paths join all
//! results before the suggestion engine runs, and the engine's stable
//! sort makes the output identical either way.
//!
//! Batch runs check a [`CancellationToken`] between players.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::timeline::{Faction, ParsedReplay, Timeline};

use super::build_order::BuildOrderExtractor;
use super::economy::{InjectTracker, SpendingAnalyzer, SupplyBlockDetector};
use super::mechanics::{ApmAggregator, ArmySampler};
use super::result::AnalysisResult;
use super::strategic::{MatchSide, StrategicComparator, StrategicReport};
use super::suggestions::SuggestionEngine;
use super::{AnalysisContext, Analyzer};

/// Shared cancellation flag for batch runs.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Headline numbers of one result, as tracked across matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetrics {
    pub apm: f64,
    pub spending_quotient: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisCoordinator {
    config: AnalysisConfig,
}

fn run<A: Analyzer>(analyzer: A, ctx: &AnalysisContext<'_>) -> Option<A::Output> {
    let output = analyzer.analyze(ctx);
    debug!(
        analyzer = A::NAME,
        player = ctx.player_id,
        produced = output.is_some(),
        "analyzer finished"
    );
    output
}

impl AnalysisCoordinator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one player of a timeline.
    ///
    /// Errors only when `duration_secs` is negative or not finite; an empty
    /// timeline yields a result with every section absent.
    pub fn analyze_timeline(
        &self,
        timeline: &Timeline,
        player_id: u32,
        faction: Faction,
        duration_secs: f64,
    ) -> Result<AnalysisResult> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(AnalysisError::InvalidDuration { duration: duration_secs });
        }

        let ctx = AnalysisContext::new(timeline, player_id, faction, duration_secs);
        let build_order = BuildOrderExtractor::with_horizon(self.config.build_order_horizon_secs);

        let mut result = if self.config.parallel {
            let (((supply, spending), (apm, build)), (inject, army)) = rayon::join(
                || {
                    rayon::join(
                        || {
                            rayon::join(
                                || run(SupplyBlockDetector, &ctx),
                                || run(SpendingAnalyzer, &ctx),
                            )
                        },
                        || rayon::join(|| run(ApmAggregator, &ctx), || run(build_order, &ctx)),
                    )
                },
                || rayon::join(|| run(InjectTracker, &ctx), || run(ArmySampler, &ctx)),
            );
            AnalysisResult {
                supply_analysis: supply,
                spending_analysis: spending,
                apm_analysis: apm,
                build_order: build,
                inject_analysis: inject,
                army_analysis: army,
                suggestions: Vec::new(),
            }
        } else {
            AnalysisResult {
                supply_analysis: run(SupplyBlockDetector, &ctx),
                spending_analysis: run(SpendingAnalyzer, &ctx),
                apm_analysis: run(ApmAggregator, &ctx),
                build_order: run(build_order, &ctx),
                inject_analysis: run(InjectTracker, &ctx),
                army_analysis: run(ArmySampler, &ctx),
                suggestions: Vec::new(),
            }
        };

        result.suggestions = SuggestionEngine.generate(&result);

        info!(
            player = player_id,
            faction = %faction,
            suggestions = result.suggestions.len(),
            "player analysis complete"
        );

        Ok(result)
    }

    /// Analyze one player slot of a decoded replay.
    pub fn analyze_player(&self, replay: &ParsedReplay, slot: u32) -> Result<AnalysisResult> {
        let timeline = replay.timeline.as_ref().ok_or(AnalysisError::MissingTimeline)?;
        let player = replay.info.player(slot).ok_or(AnalysisError::PlayerNotFound { slot })?;
        self.analyze_timeline(timeline, slot, player.faction, replay.info.duration_secs)
    }

    /// Analyze every eligible player, keyed by slot.
    ///
    /// A player whose analysis fails is logged and skipped. Non-human slots
    /// are skipped unless `analyze_non_humans` is set.
    pub fn analyze_match(
        &self,
        replay: &ParsedReplay,
        token: &CancellationToken,
    ) -> Result<BTreeMap<u32, AnalysisResult>> {
        let mut results = BTreeMap::new();

        for player in &replay.info.players {
            if token.is_cancelled() {
                info!(analyzed = results.len(), "match analysis cancelled");
                return Err(AnalysisError::Cancelled);
            }
            if !player.is_human && !self.config.analyze_non_humans {
                debug!(slot = player.slot, name = %player.name, "skipping non-human player");
                continue;
            }

            match self.analyze_player(replay, player.slot) {
                Ok(result) => {
                    results.insert(player.slot, result);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(slot = player.slot, name = %player.name, error = %e, "skipping player");
                }
                Err(e) => return Err(e),
            }
        }

        info!(map = %replay.info.map, players = results.len(), "match analysis complete");
        Ok(results)
    }

    /// Loser vs. winner report from a match's per-player results.
    pub fn strategic_report(
        &self,
        replay: &ParsedReplay,
        results: &BTreeMap<u32, AnalysisResult>,
    ) -> Option<StrategicReport> {
        let winner = replay.info.winner()?;
        let loser = replay.info.loser()?;

        StrategicComparator.compare(
            MatchSide {
                name: &loser.name,
                faction: loser.faction,
                result: results.get(&loser.slot),
            },
            MatchSide {
                name: &winner.name,
                faction: winner.faction,
                result: results.get(&winner.slot),
            },
        )
    }

    pub fn player_metrics(result: &AnalysisResult) -> PlayerMetrics {
        PlayerMetrics {
            apm: result.apm_analysis.as_ref().map_or(0.0, |a| a.average_apm),
            spending_quotient: result
                .spending_analysis
                .as_ref()
                .map_or(0.0, |s| s.spending_quotient),
        }
    }

    pub fn to_json(result: &AnalysisResult) -> Result<String> {
        Ok(serde_json::to_string(result)?)
    }

    pub fn analyze_and_serialize(&self, replay: &ParsedReplay, slot: u32) -> Result<String> {
        let result = self.analyze_player(replay, slot)?;
        Self::to_json(&result)
    }
}
