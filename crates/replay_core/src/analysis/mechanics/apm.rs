//! # APM Aggregator
//!
//! Actions per minute over fixed 30 s windows, plus effective APM.
//!
//! Only selection, control group and command events count. An action is
//! effective when at least [`EAPM_MIN_TICKS_BETWEEN`] ticks passed since
//! the player's previous counted action; the first action always is.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisContext, Analyzer};

/// APM window length in seconds.
pub const APM_WINDOW_SECS: f64 = 30.0;

/// Debounce for effective actions: 8 ticks (~0.36 real seconds).
pub const EAPM_MIN_TICKS_BETWEEN: u32 = 8;

/// Activity in one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApmPoint {
    /// Window start in seconds
    pub time: f64,
    pub apm: f64,
    pub actions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApmAnalysis {
    pub average_apm: f64,
    pub peak_apm: f64,
    pub eapm: f64,
    pub total_actions: u32,
    pub effective_actions: u32,
    /// Non-empty windows, ascending by start
    pub apm_timeline: Vec<ApmPoint>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApmAggregator;

impl Analyzer for ApmAggregator {
    type Output = ApmAnalysis;
    const NAME: &'static str = "apm";

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<ApmAnalysis> {
        if ctx.duration_secs.is_nan() || ctx.duration_secs <= 0.0 {
            return None;
        }

        let mut windows: BTreeMap<u32, u32> = BTreeMap::new();
        let mut total_actions = 0u32;
        let mut effective_actions = 0u32;
        let mut last_tick: Option<u32> = None;

        for evt in ctx.player_actions() {
            total_actions += 1;

            let effective = match last_tick {
                None => true,
                Some(prev) => evt.tick.saturating_sub(prev) >= EAPM_MIN_TICKS_BETWEEN,
            };
            if effective {
                effective_actions += 1;
            }
            last_tick = Some(evt.tick);

            let window = (evt.time_secs() / APM_WINDOW_SECS).floor() as u32;
            *windows.entry(window).or_insert(0) += 1;
        }

        if total_actions == 0 {
            return None;
        }

        let minutes = ctx.duration_secs / 60.0;
        let per_window_scale = 60.0 / APM_WINDOW_SECS;

        let apm_timeline: Vec<ApmPoint> = windows
            .into_iter()
            .map(|(window, actions)| ApmPoint {
                time: window as f64 * APM_WINDOW_SECS,
                apm: actions as f64 * per_window_scale,
                actions,
            })
            .collect();
        let peak_apm = apm_timeline.iter().map(|p| p.apm).fold(0.0, f64::max);

        let analysis = ApmAnalysis {
            average_apm: total_actions as f64 / minutes,
            peak_apm,
            eapm: effective_actions as f64 / minutes,
            total_actions,
            effective_actions,
            apm_timeline,
        };

        debug!(
            player = ctx.player_id,
            total_actions,
            average_apm = analysis.average_apm,
            "apm analysis done"
        );

        Some(analysis)
    }
}
