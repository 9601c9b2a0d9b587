//! # Trends
//!
//! Direction of a player's headline metrics across recent matches.
//!
//! ## Algorithm
//! 1. Samples come newest first
//! 2. `change = (newest - oldest) / oldest × 100`, 0 when `oldest <= 0`
//! 3. Above +5 % is improving, below -5 % declining, anything else stable
//!
//! With fewer than two matches no trend is reported at all.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::coordinator::PlayerMetrics;

/// Change (in percent) beyond which a metric is moving.
pub const TREND_THRESHOLD_PCT: f64 = 5.0;

pub const APM_METRIC: &str = "apm";
pub const SPENDING_QUOTIENT_METRIC: &str = "spending_quotient";

/// Headline metrics of one analyzed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSample {
    pub replay_id: i64,
    pub played_at: DateTime<Utc>,
    pub apm: f64,
    pub spending_quotient: f64,
}

impl MatchSample {
    pub fn new(replay_id: i64, played_at: DateTime<Utc>, metrics: PlayerMetrics) -> Self {
        Self {
            replay_id,
            played_at,
            apm: metrics.apm,
            spending_quotient: metrics.spending_quotient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl TrendDirection {
    pub fn from_change(change: f64) -> Self {
        if change > TREND_THRESHOLD_PCT {
            TrendDirection::Improving
        } else if change < -TREND_THRESHOLD_PCT {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub replay_id: i64,
    pub played_at: DateTime<Utc>,
    pub value: f64,
}

/// One metric over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub metric: String,
    /// Newest first
    pub data_points: Vec<TrendPoint>,
    pub trend: TrendDirection,
    /// Percent change from the oldest to the newest match
    pub change: f64,
}

impl Trend {
    fn compute(metric: &str, samples: &[MatchSample], value: impl Fn(&MatchSample) -> f64) -> Self {
        let data_points: Vec<TrendPoint> = samples
            .iter()
            .map(|s| TrendPoint { replay_id: s.replay_id, played_at: s.played_at, value: value(s) })
            .collect();

        let (trend, change) = match (data_points.first(), data_points.last()) {
            (Some(newest), Some(oldest)) if data_points.len() >= 2 => {
                let change = if oldest.value > 0.0 {
                    (newest.value - oldest.value) / oldest.value * 100.0
                } else {
                    0.0
                };
                (TrendDirection::from_change(change), change)
            }
            _ => (TrendDirection::InsufficientData, 0.0),
        };

        Self { metric: metric.to_string(), data_points, trend, change }
    }
}

/// Trends keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendReport {
    pub trends: BTreeMap<String, Trend>,
}

impl TrendReport {
    /// Trends over `samples`, which must be ordered newest first.
    pub fn from_samples(samples: &[MatchSample]) -> Self {
        let mut trends = BTreeMap::new();
        if samples.len() < 2 {
            return Self { trends };
        }

        trends.insert(APM_METRIC.to_string(), Trend::compute(APM_METRIC, samples, |s| s.apm));
        trends.insert(
            SPENDING_QUOTIENT_METRIC.to_string(),
            Trend::compute(SPENDING_QUOTIENT_METRIC, samples, |s| s.spending_quotient),
        );

        debug!(matches = samples.len(), "trends computed");
        Self { trends }
    }

    pub fn get(&self, metric: &str) -> Option<&Trend> {
        self.trends.get(metric)
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}
