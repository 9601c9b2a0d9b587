//! Strategic report types.

use serde::{Deserialize, Serialize};

use crate::analysis::economy::Severity;
use crate::analysis::result::Priority;
use crate::data::MatchupTips;
use crate::timeline::Faction;

/// One metric side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    /// The losing player's value
    pub player_value: f64,
    /// The winner's value
    pub enemy_value: f64,
    pub is_worse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyBlockSummary {
    pub time: f64,
    pub duration: f64,
    pub severity: Severity,
}

/// How a fight went from the losing player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAssessment {
    LopsidedLoss,
    BadTrade,
    GoodTrade,
    SlightDisadvantage,
    SlightAdvantage,
}

impl TradeAssessment {
    /// Classify unit losses of one sample interval.
    pub fn classify(player_loss: i64, enemy_loss: i64) -> Self {
        if player_loss > 0 && enemy_loss == 0 {
            TradeAssessment::LopsidedLoss
        } else if player_loss > enemy_loss * 2 {
            TradeAssessment::BadTrade
        } else if player_loss < enemy_loss {
            TradeAssessment::GoodTrade
        } else if player_loss > enemy_loss {
            TradeAssessment::SlightDisadvantage
        } else {
            TradeAssessment::SlightAdvantage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TradeAssessment::LopsidedLoss => "Lopsided loss",
            TradeAssessment::BadTrade => "Bad trade",
            TradeAssessment::GoodTrade => "Good trade",
            TradeAssessment::SlightDisadvantage => "Slight disadvantage",
            TradeAssessment::SlightAdvantage => "Slight advantage",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, TradeAssessment::GoodTrade | TradeAssessment::SlightAdvantage)
    }
}

/// Interval in which either side lost a notable number of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalMoment {
    pub time: f64,
    /// Units lost by the losing player since the previous sample
    pub player_loss: i64,
    /// Units lost by the winner since the previous sample
    pub enemy_loss: i64,
    pub assessment: TradeAssessment,
    /// Readable form of `assessment`, e.g. "Lopsided loss"
    pub description: String,
    pub is_positive: bool,
}

/// Problem families the comparator checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    SupplyBlocks,
    Spending,
    Apm,
    ArmySize,
    Injects,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedProblem {
    pub kind: ProblemKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementStep {
    pub category: String,
    pub title: String,
    pub description: String,
}

/// Head-to-head review of a lost match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicReport {
    pub winner: String,
    pub loser: String,
    pub winner_race: Faction,
    pub loser_race: Faction,
    /// Loser first, e.g. `"ZvP"`
    pub matchup: String,
    pub metrics_comparison: Vec<MetricComparison>,
    pub supply_blocks: Vec<SupplyBlockSummary>,
    /// At most ten, in time order
    pub critical_moments: Vec<CriticalMoment>,
    pub problems: Vec<IdentifiedProblem>,
    pub matchup_tips: MatchupTips,
    pub improvement_steps: Vec<ImprovementStep>,
    pub summary: String,
}
