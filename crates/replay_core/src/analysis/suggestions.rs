//! # Suggestion Engine
//!
//! Threshold rules that turn analyzer results into coaching advice.
//!
//! ## Algorithm
//! 1. Run the rule set of each analyzer in fixed order: supply, spending,
//!    APM, inject, army (missing results contribute nothing)
//! 2. Stable sort by priority, high first, so rules of equal priority keep
//!    their analyzer order

use tracing::debug;

use super::economy::{InjectAnalysis, Severity, SpendingAnalysis, SpendingRating, SupplyAnalysis};
use super::mechanics::{ApmAnalysis, ArmyAnalysis};
use super::result::{AnalysisResult, Category, Priority, Suggestion};

/// Block percentage above which supply blocks are a high priority.
pub const SUPPLY_BLOCK_HIGH_PCT: f64 = 10.0;
/// Block percentage above which supply blocks are worth a mention.
pub const SUPPLY_BLOCK_MEDIUM_PCT: f64 = 5.0;

pub const UNSPENT_MINERALS_LIMIT: f64 = 1000.0;
pub const UNSPENT_GAS_LIMIT: f64 = 500.0;

pub const LOW_APM: f64 = 50.0;
/// EAPM / APM below this means a lot of spam.
pub const LOW_EAPM_RATIO: f64 = 0.6;
/// A window below this share of the average APM is a dip.
pub const APM_DIP_RATIO: f64 = 0.3;
/// Dips during the opening are ignored.
pub const APM_DIP_GRACE_SECS: f64 = 120.0;

pub const INJECT_EFFICIENCY_HIGH: f64 = 50.0;
pub const INJECT_EFFICIENCY_MEDIUM: f64 = 70.0;
pub const MISSED_INJECTS_LIMIT: u32 = 10;

/// Share of army value lost between two samples that counts as a big loss.
pub const BIG_LOSS_RATIO: f64 = 0.5;
/// Armies worth this much or less are too small to flag.
pub const BIG_LOSS_MIN_VALUE: u32 = 500;

/// `m:ss` clock label.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// All suggestions for one player's result, sorted by priority.
    pub fn generate(&self, result: &AnalysisResult) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        if let Some(supply) = &result.supply_analysis {
            suggestions.extend(supply_suggestions(supply));
        }
        if let Some(spending) = &result.spending_analysis {
            suggestions.extend(spending_suggestions(spending));
        }
        if let Some(apm) = &result.apm_analysis {
            suggestions.extend(apm_suggestions(apm));
        }
        if let Some(inject) = &result.inject_analysis {
            suggestions.extend(inject_suggestions(inject));
        }
        if let Some(army) = &result.army_analysis {
            suggestions.extend(army_suggestions(army));
        }

        suggestions.sort_by_key(|s| s.priority.rank());

        debug!(count = suggestions.len(), "suggestions generated");
        suggestions
    }
}

fn supply_suggestions(analysis: &SupplyAnalysis) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if analysis.block_percentage > SUPPLY_BLOCK_HIGH_PCT {
        out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Too many supply blocks",
                format!(
                    "You were supply blocked for {:.1}% of the game. Build supply ahead of time.",
                    analysis.block_percentage
                ),
            )
            .with_target("< 5% block time"),
        );
    } else if analysis.block_percentage > SUPPLY_BLOCK_MEDIUM_PCT {
        out.push(
            Suggestion::new(
                Priority::Medium,
                Category::Macro,
                "Reduce supply blocks",
                "Some supply blocks could have been avoided. Keep an eye on your supply cap.",
            )
            .with_target("< 5% block time"),
        );
    }

    for block in analysis.blocks.iter().filter(|b| b.severity == Severity::High) {
        out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Long supply block",
                format!(
                    "Supply blocked for {:.0} seconds at {}",
                    block.duration,
                    format_clock(block.start_time)
                ),
            )
            .at(block.start_time)
            .with_target("< 5s"),
        );
    }

    out
}

fn spending_suggestions(analysis: &SpendingAnalysis) -> Vec<Suggestion> {
    let mut out = Vec::new();

    match analysis.rating {
        SpendingRating::Poor => out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Spend your resources",
                format!(
                    "Your spending quotient of {:.0} is low. Add production or keep units queued.",
                    analysis.spending_quotient
                ),
            )
            .with_target("> 90 SQ"),
        ),
        SpendingRating::BelowAverage => out.push(
            Suggestion::new(
                Priority::Medium,
                Category::Macro,
                "Improve spending",
                "Resources often pile up unused. Try to produce continuously.",
            )
            .with_target("> 100 SQ"),
        ),
        _ => {}
    }

    if analysis.average_unspent.minerals > UNSPENT_MINERALS_LIMIT {
        out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Too many unspent minerals",
                format!(
                    "You floated {:.0} minerals on average. Build more production structures.",
                    analysis.average_unspent.minerals
                ),
            )
            .with_target("< 500 minerals"),
        );
    }

    if analysis.average_unspent.gas > UNSPENT_GAS_LIMIT {
        out.push(
            Suggestion::new(
                Priority::Medium,
                Category::Macro,
                "Too much unspent gas",
                format!(
                    "You floated {:.0} gas on average. Add gas-heavy units or tech.",
                    analysis.average_unspent.gas
                ),
            )
            .with_target("< 300 gas"),
        );
    }

    out
}

fn apm_suggestions(analysis: &ApmAnalysis) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if analysis.average_apm < LOW_APM {
        out.push(
            Suggestion::new(
                Priority::Medium,
                Category::Micro,
                "Raise your APM",
                format!(
                    "Your APM of {:.0} is low. Practice hotkeys and faster inputs.",
                    analysis.average_apm
                ),
            )
            .with_target("> 80 APM"),
        );
    }

    if analysis.average_apm > 0.0 && analysis.eapm / analysis.average_apm < LOW_EAPM_RATIO {
        out.push(
            Suggestion::new(
                Priority::Low,
                Category::Micro,
                "Fewer spam actions",
                "Your EAPM/APM ratio shows many ineffective actions. Focus on meaningful commands.",
            )
            .with_target("> 70% EAPM/APM"),
        );
    }

    if analysis.apm_timeline.len() > 2 {
        let threshold = analysis.average_apm * APM_DIP_RATIO;
        let dip = analysis
            .apm_timeline
            .iter()
            .find(|p| p.apm < threshold && p.time > APM_DIP_GRACE_SECS);
        if let Some(point) = dip {
            out.push(
                Suggestion::new(
                    Priority::Low,
                    Category::Micro,
                    "APM dip detected",
                    format!(
                        "Your APM dropped sharply at {}. Try to stay evenly active.",
                        format_clock(point.time)
                    ),
                )
                .at(point.time),
            );
        }
    }

    out
}

fn inject_suggestions(analysis: &InjectAnalysis) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if analysis.efficiency < INJECT_EFFICIENCY_HIGH {
        out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Improve inject efficiency",
                format!(
                    "Your inject efficiency is only {:.0}%. Use hotkeys and a steady inject cycle.",
                    analysis.efficiency
                ),
            )
            .with_target("> 80% efficiency"),
        );
    } else if analysis.efficiency < INJECT_EFFICIENCY_MEDIUM {
        out.push(
            Suggestion::new(
                Priority::Medium,
                Category::Macro,
                "Tighten injects",
                format!(
                    "Your inject efficiency of {:.0}% can improve. Practice the inject rhythm.",
                    analysis.efficiency
                ),
            )
            .with_target("> 85% efficiency"),
        );
    }

    if analysis.missed_injects > MISSED_INJECTS_LIMIT {
        out.push(
            Suggestion::new(
                Priority::High,
                Category::Macro,
                "Too many missed injects",
                format!(
                    "You missed about {} injects. Set a timer or use a dedicated inject hotkey.",
                    analysis.missed_injects
                ),
            )
            .with_target("< 5 missed injects"),
        );
    }

    out
}

fn army_suggestions(analysis: &ArmyAnalysis) -> Vec<Suggestion> {
    let big_loss = analysis.army_timeline.windows(2).find(|pair| {
        let (previous, current) = (&pair[0], &pair[1]);
        if previous.value <= BIG_LOSS_MIN_VALUE {
            return false;
        }
        let lost = previous.value as f64 - current.value as f64;
        lost / previous.value as f64 > BIG_LOSS_RATIO
    });

    big_loss
        .map(|pair| {
            let time = pair[1].time;
            Suggestion::new(
                Priority::High,
                Category::Micro,
                "Big army loss",
                format!(
                    "You lost over half of your army at {}. Pick your engagements more carefully.",
                    format_clock(time)
                ),
            )
            .at(time)
        })
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::economy::{ResourceValue, SupplyBlock};
    use crate::analysis::mechanics::{ApmPoint, ArmyPoint};

    fn army(points: &[(f64, u32)]) -> ArmyAnalysis {
        ArmyAnalysis {
            peak_army_value: points.iter().map(|p| p.1).max().unwrap_or(0),
            army_timeline: points
                .iter()
                .map(|&(time, value)| ArmyPoint { time, value, unit_count: value / 100 })
                .collect(),
            unit_composition: Vec::new(),
        }
    }

    fn spending(rating: SpendingRating, minerals: f64, gas: f64) -> SpendingAnalysis {
        SpendingAnalysis {
            spending_quotient: 60.0,
            rating,
            average_unspent: ResourceValue { minerals, gas },
            average_income: ResourceValue::default(),
            resource_timeline: Vec::new(),
        }
    }

    fn block(start: f64, duration: f64) -> SupplyBlock {
        SupplyBlock {
            start_time: start,
            end_time: start + duration,
            duration,
            severity: Severity::from_duration(duration),
            supply_used: 30,
            supply_max: 30,
        }
    }

    #[test]
    fn test_big_army_loss_fires_once() {
        let result = AnalysisResult {
            army_analysis: Some(army(&[(30.0, 1000), (60.0, 400)])),
            ..Default::default()
        };
        let suggestions = SuggestionEngine.generate(&result);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].priority, Priority::High);
        assert_eq!(suggestions[0].category, Category::Micro);
        assert_eq!(suggestions[0].timestamp, Some(60.0));
    }

    #[test]
    fn test_big_army_loss_needs_large_army() {
        let small = army(&[(30.0, 500), (60.0, 0), (90.0, 900), (120.0, 100)]);
        let suggestions = army_suggestions(&small);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].timestamp, Some(120.0));

        assert!(army_suggestions(&army(&[(30.0, 1000)])).is_empty());
    }

    #[test]
    fn test_supply_rules() {
        let analysis = SupplyAnalysis {
            total_block_time: 60.0,
            block_percentage: 12.0,
            blocks: vec![block(100.0, 3.0), block(200.0, 20.0), block(300.0, 37.0)],
            supply_timeline: Vec::new(),
        };
        let out = supply_suggestions(&analysis);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|s| s.priority == Priority::High));
        assert_eq!(out[1].timestamp, Some(200.0));
        assert_eq!(out[2].timestamp, Some(300.0));

        let mild = SupplyAnalysis { block_percentage: 7.5, blocks: Vec::new(), ..analysis.clone() };
        let out = supply_suggestions(&mild);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].priority, Priority::Medium);

        let fine = SupplyAnalysis { block_percentage: 5.0, blocks: Vec::new(), ..analysis };
        assert!(supply_suggestions(&fine).is_empty());
    }

    #[test]
    fn test_spending_rules() {
        let out = spending_suggestions(&spending(SpendingRating::Poor, 1200.0, 600.0));
        let priorities: Vec<Priority> = out.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![Priority::High, Priority::High, Priority::Medium]);

        let out = spending_suggestions(&spending(SpendingRating::Good, 300.0, 100.0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_apm_rules() {
        let analysis = ApmAnalysis {
            average_apm: 40.0,
            peak_apm: 80.0,
            eapm: 20.0,
            total_actions: 400,
            effective_actions: 200,
            apm_timeline: vec![
                ApmPoint { time: 0.0, apm: 4.0, actions: 2 },
                ApmPoint { time: 150.0, apm: 80.0, actions: 40 },
                ApmPoint { time: 180.0, apm: 10.0, actions: 5 },
                ApmPoint { time: 210.0, apm: 2.0, actions: 1 },
            ],
        };
        let out = apm_suggestions(&analysis);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].priority, Priority::Medium);
        assert_eq!(out[1].priority, Priority::Low);
        // the opening window is ignored; only the first dip is reported
        assert_eq!(out[2].timestamp, Some(180.0));
    }

    #[test]
    fn test_inject_rules() {
        let analysis = InjectAnalysis {
            efficiency: 60.0,
            total_injects: 30,
            missed_injects: 20,
            inject_timeline: Vec::new(),
            missed_windows: Vec::new(),
        };
        let out = inject_suggestions(&analysis);
        let priorities: Vec<Priority> = out.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![Priority::Medium, Priority::High]);
    }

    #[test]
    fn test_global_order_is_stable_by_priority() {
        let result = AnalysisResult {
            supply_analysis: Some(SupplyAnalysis {
                total_block_time: 40.0,
                block_percentage: 7.0,
                blocks: Vec::new(),
                supply_timeline: Vec::new(),
            }),
            spending_analysis: Some(spending(SpendingRating::Poor, 0.0, 0.0)),
            army_analysis: Some(army(&[(30.0, 2000), (60.0, 100)])),
            ..Default::default()
        };
        let titles: Vec<String> =
            SuggestionEngine.generate(&result).into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec!["Spend your resources", "Big army loss", "Reduce supply blocks"]
        );
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(-3.0), "0:00");
    }
}
