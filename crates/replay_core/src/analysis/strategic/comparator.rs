//! Loser vs. winner comparison.

use std::collections::HashMap;

use tracing::debug;

use crate::analysis::economy::SpendingRating;
use crate::analysis::mechanics::ArmyPoint;
use crate::analysis::result::{AnalysisResult, Priority};
use crate::data::{matchup_label, matchup_tips};
use crate::timeline::Faction;

use super::report::{
    CriticalMoment, IdentifiedProblem, ImprovementStep, MetricComparison, ProblemKind,
    StrategicReport, SupplyBlockSummary, TradeAssessment,
};

/// APM / EAPM below this share of the opponent's is worse.
pub const APM_WORSE_RATIO: f64 = 0.8;
/// APM below this share of the opponent's is a problem.
pub const APM_PROBLEM_RATIO: f64 = 0.7;
/// SQ this far below the opponent's is worse.
pub const SQ_WORSE_MARGIN: f64 = 20.0;
pub const UNSPENT_WORSE_RATIO: f64 = 1.5;
pub const BLOCK_TIME_WORSE_RATIO: f64 = 1.5;
pub const BLOCK_COUNT_WORSE_MARGIN: usize = 2;
/// Unit count drop that marks an interval as a fight.
pub const CRITICAL_UNIT_LOSS: i64 = 2;
pub const MAX_CRITICAL_MOMENTS: usize = 10;

/// One player of the compared match.
#[derive(Debug, Clone, Copy)]
pub struct MatchSide<'a> {
    pub name: &'a str,
    pub faction: Faction,
    pub result: Option<&'a AnalysisResult>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StrategicComparator;

impl StrategicComparator {
    /// Build the report, or `None` when either side has no result.
    pub fn compare(&self, loser: MatchSide<'_>, winner: MatchSide<'_>) -> Option<StrategicReport> {
        let loser_result = loser.result?;
        let winner_result = winner.result?;

        let problems = identify_problems(loser_result, winner_result);
        let improvement_steps = improvement_steps(&problems);
        let summary = summarize(loser.faction, winner.faction, &problems);

        let report = StrategicReport {
            winner: winner.name.to_string(),
            loser: loser.name.to_string(),
            winner_race: winner.faction,
            loser_race: loser.faction,
            matchup: matchup_label(loser.faction, winner.faction),
            metrics_comparison: compare_metrics(loser_result, winner_result),
            supply_blocks: supply_blocks(loser_result),
            critical_moments: critical_moments(loser_result, winner_result),
            problems,
            matchup_tips: matchup_tips(loser.faction, winner.faction),
            improvement_steps,
            summary,
        };

        debug!(
            matchup = %report.matchup,
            problems = report.problems.len(),
            critical_moments = report.critical_moments.len(),
            "strategic report built"
        );

        Some(report)
    }
}

fn metric(name: &str, player_value: f64, enemy_value: f64, is_worse: bool) -> MetricComparison {
    MetricComparison { metric: name.to_string(), player_value, enemy_value, is_worse }
}

fn compare_metrics(loser: &AnalysisResult, winner: &AnalysisResult) -> Vec<MetricComparison> {
    let mut out = Vec::new();

    if let (Some(l), Some(w)) = (&loser.apm_analysis, &winner.apm_analysis) {
        out.push(metric(
            "APM (average)",
            l.average_apm,
            w.average_apm,
            l.average_apm < w.average_apm * APM_WORSE_RATIO,
        ));
        out.push(metric("EAPM (effective)", l.eapm, w.eapm, l.eapm < w.eapm * APM_WORSE_RATIO));
    }

    if let (Some(l), Some(w)) = (&loser.spending_analysis, &winner.spending_analysis) {
        out.push(metric(
            "Spending Quotient",
            l.spending_quotient,
            w.spending_quotient,
            l.spending_quotient < w.spending_quotient - SQ_WORSE_MARGIN,
        ));
        out.push(metric(
            "Avg. unspent minerals",
            l.average_unspent.minerals,
            w.average_unspent.minerals,
            l.average_unspent.minerals > w.average_unspent.minerals * UNSPENT_WORSE_RATIO,
        ));
    }

    if let (Some(l), Some(w)) = (&loser.supply_analysis, &winner.supply_analysis) {
        out.push(metric(
            "Supply block time (%)",
            l.block_percentage,
            w.block_percentage,
            l.block_percentage > w.block_percentage * BLOCK_TIME_WORSE_RATIO,
        ));
        out.push(metric(
            "Supply blocks",
            l.blocks.len() as f64,
            w.blocks.len() as f64,
            l.blocks.len() > w.blocks.len() + BLOCK_COUNT_WORSE_MARGIN,
        ));
    }

    if let (Some(l), Some(w)) = (&loser.army_analysis, &winner.army_analysis) {
        out.push(metric(
            "Peak army value",
            l.peak_army_value as f64,
            w.peak_army_value as f64,
            army_far_smaller(l.peak_army_value, w.peak_army_value),
        ));
    }

    out
}

fn army_far_smaller(player_peak: u32, enemy_peak: u32) -> bool {
    (player_peak as f64) < enemy_peak as f64 / 2.0
}

fn supply_blocks(loser: &AnalysisResult) -> Vec<SupplyBlockSummary> {
    loser
        .supply_analysis
        .iter()
        .flat_map(|s| &s.blocks)
        .map(|b| SupplyBlockSummary {
            time: b.start_time,
            duration: b.duration,
            severity: b.severity,
        })
        .collect()
}

/// Army samples of both players share their times, so the winner's
/// timeline is looked up by the exact sample time.
fn critical_moments(loser: &AnalysisResult, winner: &AnalysisResult) -> Vec<CriticalMoment> {
    let (Some(loser_army), Some(winner_army)) = (&loser.army_analysis, &winner.army_analysis) else {
        return Vec::new();
    };

    let winner_counts: HashMap<u64, i64> = winner_army
        .army_timeline
        .iter()
        .map(|p| (p.time.to_bits(), p.unit_count as i64))
        .collect();
    let winner_at = |point: &ArmyPoint| winner_counts.get(&point.time.to_bits()).copied();

    let mut points = loser_army.army_timeline.iter();
    let Some(first) = points.next() else {
        return Vec::new();
    };
    let mut last_player = first.unit_count as i64;
    let mut last_enemy = winner_at(first).unwrap_or(0);

    let mut moments = Vec::new();
    for point in points {
        let player_loss = last_player - point.unit_count as i64;
        let enemy_loss = match winner_at(point) {
            Some(count) => {
                let loss = last_enemy - count;
                last_enemy = count;
                loss
            }
            None => 0,
        };
        last_player = point.unit_count as i64;

        let fight = player_loss > CRITICAL_UNIT_LOSS || enemy_loss > CRITICAL_UNIT_LOSS;
        if fight && (player_loss > 0 || enemy_loss > 0) {
            let assessment = TradeAssessment::classify(player_loss, enemy_loss);
            moments.push(CriticalMoment {
                time: point.time,
                player_loss,
                enemy_loss,
                assessment,
                description: assessment.label().to_string(),
                is_positive: assessment.is_positive(),
            });
        }
    }

    let combined = |m: &CriticalMoment| m.player_loss.max(0) + m.enemy_loss.max(0);
    moments.sort_by(|a, b| combined(b).cmp(&combined(a)));
    moments.truncate(MAX_CRITICAL_MOMENTS);
    moments.sort_by(|a, b| a.time.total_cmp(&b.time));
    moments
}

fn problem(
    kind: ProblemKind,
    priority: Priority,
    title: String,
    description: impl Into<String>,
) -> IdentifiedProblem {
    IdentifiedProblem { kind, title, description: description.into(), priority }
}

fn identify_problems(loser: &AnalysisResult, winner: &AnalysisResult) -> Vec<IdentifiedProblem> {
    let mut out = Vec::new();

    if let Some(supply) = &loser.supply_analysis {
        let priority = if supply.block_percentage > 10.0 {
            Some(Priority::High)
        } else if supply.block_percentage > 5.0 {
            Some(Priority::Medium)
        } else {
            None
        };
        if let Some(priority) = priority {
            out.push(problem(
                ProblemKind::SupplyBlocks,
                priority,
                format!("Supply blocks ({:.1}% of the game)", supply.block_percentage),
                "You were supply blocked too often and could not produce units.",
            ));
        }
    }

    if let Some(spending) = &loser.spending_analysis {
        let priority = match spending.rating {
            SpendingRating::Poor => Some(Priority::High),
            SpendingRating::BelowAverage => Some(Priority::Medium),
            _ => None,
        };
        if let Some(priority) = priority {
            out.push(problem(
                ProblemKind::Spending,
                priority,
                format!("Low spending quotient ({:.0})", spending.spending_quotient),
                "You banked too many resources instead of spending them.",
            ));
        }
    }

    if let (Some(l), Some(w)) = (&loser.apm_analysis, &winner.apm_analysis) {
        if l.average_apm < w.average_apm * APM_PROBLEM_RATIO {
            out.push(problem(
                ProblemKind::Apm,
                Priority::Medium,
                "Much lower APM than the opponent".to_string(),
                format!(
                    "Your APM ({:.0}) was far below your opponent's ({:.0}).",
                    l.average_apm, w.average_apm
                ),
            ));
        }
    }

    if let (Some(l), Some(w)) = (&loser.army_analysis, &winner.army_analysis) {
        if army_far_smaller(l.peak_army_value, w.peak_army_value) {
            out.push(problem(
                ProblemKind::ArmySize,
                Priority::High,
                "Army too small".to_string(),
                format!(
                    "Your peak army value ({}) was far below your opponent's ({}).",
                    l.peak_army_value, w.peak_army_value
                ),
            ));
        }
    }

    if let Some(inject) = &loser.inject_analysis {
        if inject.efficiency < 50.0 {
            out.push(problem(
                ProblemKind::Injects,
                Priority::High,
                format!("Low inject efficiency ({:.0}%)", inject.efficiency),
                "Your hatcheries sat without injects for long stretches.",
            ));
        }
    }

    out
}

fn step(category: &str, title: &str, description: &str) -> ImprovementStep {
    ImprovementStep {
        category: category.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn improvement_steps(problems: &[IdentifiedProblem]) -> Vec<ImprovementStep> {
    let mut steps: Vec<ImprovementStep> = problems
        .iter()
        .map(|p| match p.kind {
            ProblemKind::SupplyBlocks => step(
                "MACRO",
                "Build supply earlier",
                "Start the next Pylon, Depot or Overlord before you need it. At 75% of your cap, \
                 add supply.",
            ),
            ProblemKind::Spending => step(
                "MACRO",
                "Spend resources faster",
                "Add production or start upgrades. Banked resources do not win games.",
            ),
            ProblemKind::Apm => step(
                "MECHANICS",
                "Practice hotkeys and camera locations",
                "Put your army and production on control groups and drill camera hotkeys.",
            ),
            ProblemKind::ArmySize => step(
                "PRODUCTION",
                "Produce units continuously",
                "Keep production busy. Add Barracks, Gateways or Hatcheries when resources pile \
                 up.",
            ),
            ProblemKind::Injects => step(
                "MACRO",
                "Keep an inject rhythm",
                "Cycle through your Hatcheries with a hotkey and re-inject as soon as larvae pop.",
            ),
        })
        .collect();

    steps.push(step(
        "BUILD ORDER",
        "Practice a standard build",
        "Pick one build and repeat it against the AI until you can play it without thinking.",
    ));
    steps.push(step(
        "SCOUTING",
        "Scout regularly",
        "Scout for tech around 3:30 to 4:00 and react to what you see.",
    ));

    steps
}

fn narration(kind: ProblemKind) -> &'static str {
    match kind {
        ProblemKind::SupplyBlocks => "Too many supply blocks, so fewer units were produced",
        ProblemKind::Spending => "Resources went unspent, so the army was weaker",
        ProblemKind::Apm => "Lower APM, so reactions were slower",
        ProblemKind::ArmySize => "Too little army, so attacks could not be held",
        ProblemKind::Injects => "Missed injects, so fewer larvae were available",
    }
}

fn summarize(loser: Faction, winner: Faction, problems: &[IdentifiedProblem]) -> String {
    let mut reasons: Vec<&str> = problems
        .iter()
        .filter(|p| p.priority == Priority::High)
        .map(|p| narration(p.kind))
        .collect();

    if reasons.is_empty() {
        reasons = problems
            .iter()
            .filter(|p| p.priority == Priority::Medium)
            .map(|p| p.title.as_str())
            .collect();
    }

    let mut summary =
        format!("You lost as {loser} against {winner}.\n\nThe main reasons were likely:\n");
    for reason in reasons {
        summary.push_str("- ");
        summary.push_str(reason);
        summary.push('\n');
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::economy::{
        InjectAnalysis, ResourceValue, Severity, SpendingAnalysis, SupplyAnalysis, SupplyBlock,
    };
    use crate::analysis::mechanics::{ApmAnalysis, ArmyAnalysis};

    fn apm(average: f64) -> ApmAnalysis {
        ApmAnalysis {
            average_apm: average,
            peak_apm: average,
            eapm: average * 0.8,
            total_actions: 0,
            effective_actions: 0,
            apm_timeline: Vec::new(),
        }
    }

    fn army(counts: &[(f64, u32)], peak: u32) -> ArmyAnalysis {
        ArmyAnalysis {
            peak_army_value: peak,
            army_timeline: counts
                .iter()
                .map(|&(time, unit_count)| ArmyPoint { time, value: unit_count * 100, unit_count })
                .collect(),
            unit_composition: Vec::new(),
        }
    }

    fn spending(sq: f64) -> SpendingAnalysis {
        SpendingAnalysis {
            spending_quotient: sq,
            rating: SpendingRating::from_sq(sq),
            average_unspent: ResourceValue { minerals: 900.0, gas: 200.0 },
            average_income: ResourceValue::default(),
            resource_timeline: Vec::new(),
        }
    }

    fn supply(percentage: f64, blocks: usize) -> SupplyAnalysis {
        SupplyAnalysis {
            total_block_time: 0.0,
            block_percentage: percentage,
            blocks: (0..blocks)
                .map(|i| SupplyBlock {
                    start_time: 60.0 * i as f64,
                    end_time: 60.0 * i as f64 + 20.0,
                    duration: 20.0,
                    severity: Severity::High,
                    supply_used: 40,
                    supply_max: 40,
                })
                .collect(),
            supply_timeline: Vec::new(),
        }
    }

    fn side<'a>(name: &'a str, faction: Faction, result: &'a AnalysisResult) -> MatchSide<'a> {
        MatchSide { name, faction, result: Some(result) }
    }

    fn loser_result() -> AnalysisResult {
        AnalysisResult {
            supply_analysis: Some(supply(12.0, 4)),
            spending_analysis: Some(spending(60.0)),
            apm_analysis: Some(apm(60.0)),
            army_analysis: Some(army(&[(30.0, 10), (60.0, 20), (90.0, 12), (120.0, 11)], 2000)),
            inject_analysis: Some(InjectAnalysis {
                efficiency: 40.0,
                total_injects: 4,
                missed_injects: 6,
                inject_timeline: Vec::new(),
                missed_windows: Vec::new(),
            }),
            ..Default::default()
        }
    }

    fn winner_result() -> AnalysisResult {
        AnalysisResult {
            supply_analysis: Some(supply(2.0, 1)),
            spending_analysis: Some(spending(100.0)),
            apm_analysis: Some(apm(120.0)),
            army_analysis: Some(army(&[(30.0, 8), (60.0, 15), (90.0, 14), (120.0, 6)], 5000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_side_gives_none() {
        let result = AnalysisResult::default();
        let missing = MatchSide { name: "B", faction: Faction::Terran, result: None };
        assert!(StrategicComparator.compare(side("A", Faction::Zerg, &result), missing).is_none());
        assert!(StrategicComparator.compare(missing, side("A", Faction::Zerg, &result)).is_none());
    }

    #[test]
    fn test_full_report() {
        let (loser, winner) = (loser_result(), winner_result());
        let report = StrategicComparator
            .compare(side("Alpha", Faction::Zerg, &loser), side("Beta", Faction::Terran, &winner))
            .unwrap();

        assert_eq!(report.matchup, "ZvT");
        assert_eq!(report.loser_race, Faction::Zerg);
        assert_eq!(report.supply_blocks.len(), 4);
        assert_eq!(report.matchup_tips, matchup_tips(Faction::Zerg, Faction::Terran));

        let worse: Vec<&str> = report
            .metrics_comparison
            .iter()
            .filter(|m| m.is_worse)
            .map(|m| m.metric.as_str())
            .collect();
        assert_eq!(
            worse,
            vec![
                "APM (average)",
                "EAPM (effective)",
                "Spending Quotient",
                "Supply block time (%)",
                "Supply blocks",
                "Peak army value",
            ]
        );

        let kinds: Vec<ProblemKind> = report.problems.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProblemKind::SupplyBlocks,
                ProblemKind::Spending,
                ProblemKind::Apm,
                ProblemKind::ArmySize,
                ProblemKind::Injects,
            ]
        );
        assert_eq!(report.problems[2].priority, Priority::Medium);

        // one step per problem plus the two general ones
        assert_eq!(report.improvement_steps.len(), 7);
        assert_eq!(report.improvement_steps[5].category, "BUILD ORDER");

        assert!(report.summary.starts_with("You lost as Zerg against Terran."));
        assert!(report.summary.contains(narration(ProblemKind::Injects)));
        assert!(!report.summary.contains(narration(ProblemKind::Apm)));
    }

    #[test]
    fn test_critical_moments() {
        let (loser, winner) = (loser_result(), winner_result());
        let moments = critical_moments(&loser, &winner);

        // 60s: both gained; 90s: lost 8 vs 1; 120s: lost 1 vs 8
        assert_eq!(moments.len(), 2);
        assert_eq!(moments[0].time, 90.0);
        assert_eq!(moments[0].assessment, TradeAssessment::BadTrade);
        assert_eq!(moments[0].description, "Bad trade");
        assert!(!moments[0].is_positive);
        assert_eq!(moments[1].time, 120.0);
        assert_eq!(moments[1].assessment, TradeAssessment::GoodTrade);
        assert_eq!(moments[1].description, "Good trade");
        assert!(moments[1].is_positive);
    }

    #[test]
    fn test_critical_moments_keep_largest_ten() {
        // alternating build-up and wipe: every wipe is a fight of growing size
        let mut points = Vec::new();
        for i in 0..15u32 {
            points.push((60.0 * i as f64, 10 + i));
            points.push((60.0 * i as f64 + 30.0, 0));
        }
        let loser = AnalysisResult { army_analysis: Some(army(&points, 0)), ..Default::default() };
        let winner = AnalysisResult { army_analysis: Some(army(&[], 0)), ..Default::default() };

        let moments = critical_moments(&loser, &winner);
        assert_eq!(moments.len(), MAX_CRITICAL_MOMENTS);
        assert!(moments.windows(2).all(|w| w[0].time < w[1].time));
        assert!(moments.iter().all(|m| m.player_loss >= 15));
        assert!(moments.iter().all(|m| m.assessment == TradeAssessment::LopsidedLoss));
    }

    #[test]
    fn test_summary_falls_back_to_medium_titles() {
        let loser = AnalysisResult { supply_analysis: Some(supply(7.0, 0)), ..Default::default() };
        let winner = AnalysisResult::default();
        let report = StrategicComparator
            .compare(side("A", Faction::Protoss, &loser), side("B", Faction::Protoss, &winner))
            .unwrap();
        assert_eq!(report.problems.len(), 1);
        assert!(report.summary.contains("- Supply blocks (7.0% of the game)"));
        assert!(report.metrics_comparison.is_empty());
        assert!(report.critical_moments.is_empty());
    }
}
