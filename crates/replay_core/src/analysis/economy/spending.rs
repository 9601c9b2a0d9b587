//! # Spending Analyzer
//!
//! Unspent resources, income and the Spending Quotient (SQ).
//!
//! `SQ = 35 × (0.00137 × avg_income − ln(avg_unspent + 1)) + 240`,
//! clamped to `[0, 200]` and `0` without income.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisContext, Analyzer};

/// Upper bound of the SQ scale.
pub const SQ_MAX: f64 = 200.0;

/// Share of reported income attributed to minerals.
pub const MINERAL_INCOME_SHARE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpendingRating {
    Poor,
    BelowAverage,
    Average,
    Good,
    Excellent,
}

impl SpendingRating {
    pub fn from_sq(sq: f64) -> Self {
        match sq {
            s if s < 70.0 => SpendingRating::Poor,
            s if s < 90.0 => SpendingRating::BelowAverage,
            s if s < 110.0 => SpendingRating::Average,
            s if s < 130.0 => SpendingRating::Good,
            _ => SpendingRating::Excellent,
        }
    }
}

/// Mineral / gas pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceValue {
    pub minerals: f64,
    pub gas: f64,
}

/// Resources at one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourcePoint {
    pub time: f64,
    pub minerals: i64,
    pub gas: i64,
    pub income: ResourceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpendingAnalysis {
    pub spending_quotient: f64,
    pub rating: SpendingRating,
    pub average_unspent: ResourceValue,
    /// Mean income, split 70/30 minerals/gas as an approximation
    pub average_income: ResourceValue,
    pub resource_timeline: Vec<ResourcePoint>,
}

/// Spending Quotient for the given averages.
pub fn spending_quotient(avg_income: f64, avg_unspent: f64) -> f64 {
    if avg_income.is_nan() || avg_income <= 0.0 {
        return 0.0;
    }
    let sq = 35.0 * (0.00137 * avg_income - (avg_unspent.max(0.0) + 1.0).ln()) + 240.0;
    if sq.is_nan() {
        return 0.0;
    }
    sq.clamp(0.0, SQ_MAX)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingAnalyzer;

impl Analyzer for SpendingAnalyzer {
    type Output = SpendingAnalysis;
    const NAME: &'static str = "spending";

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<SpendingAnalysis> {
        let mut total_minerals = 0.0;
        let mut total_gas = 0.0;
        let mut total_income = 0.0;
        let mut resource_timeline = Vec::new();

        for (evt, stats) in ctx.player_stats() {
            let mineral_rate = stats.mineral_income();
            let gas_rate = stats.gas_income();

            total_minerals += stats.minerals_current;
            total_gas += stats.vespene_current;
            total_income += mineral_rate + gas_rate;

            resource_timeline.push(ResourcePoint {
                time: evt.time_secs(),
                minerals: stats.minerals_current.trunc() as i64,
                gas: stats.vespene_current.trunc() as i64,
                income: ResourceValue { minerals: mineral_rate, gas: gas_rate },
            });
        }

        if resource_timeline.is_empty() {
            return None;
        }

        let samples = resource_timeline.len() as f64;
        let average_unspent =
            ResourceValue { minerals: total_minerals / samples, gas: total_gas / samples };
        let avg_income = total_income / samples;
        let average_income = ResourceValue {
            minerals: avg_income * MINERAL_INCOME_SHARE,
            gas: avg_income * (1.0 - MINERAL_INCOME_SHARE),
        };

        let sq = spending_quotient(avg_income, average_unspent.minerals + average_unspent.gas);
        let rating = SpendingRating::from_sq(sq);

        debug!(player = ctx.player_id, sq, ?rating, "spending analysis done");

        Some(SpendingAnalysis {
            spending_quotient: sq,
            rating,
            average_unspent,
            average_income,
            resource_timeline,
        })
    }
}
