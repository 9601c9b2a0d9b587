//! # Strategic Comparison
//!
//! Head-to-head review of a lost match, built from both players'
//! [`AnalysisResult`](crate::analysis::AnalysisResult)s.
//!
//! - `report` - report types
//! - `comparator` - metric diffs, fights, problems and narration
//!
//! ## Report sections
//! 1. Metric comparisons flagged where the loser is clearly behind
//! 2. The loser's supply blocks
//! 3. Critical moments: sample intervals where either side lost more than
//!    two units, graded as trades
//! 4. Identified problems and one improvement step per problem
//! 5. Matchup tips and a short summary

pub mod comparator;
pub mod report;

pub use comparator::{MatchSide, StrategicComparator};
pub use report::{
    CriticalMoment, IdentifiedProblem, ImprovementStep, MetricComparison, ProblemKind,
    StrategicReport, SupplyBlockSummary, TradeAssessment,
};
