//! # Army Sampler
//!
//! Army value and unit count over time, plus the final composition.
//!
//! ## Algorithm
//! 1. Keep a registry `tag → unit` of the player's live army units
//!    (insert on `UnitBorn`/`UnitDone`, remove on `UnitDied`)
//! 2. While scanning state/lifecycle events of any player, take a sample
//!    whenever 30 s have passed since the previous one
//! 3. Samples past the match duration are not taken
//!
//! Sampling on every player's events keeps both players' sample times
//! aligned, which the strategic comparison relies on.

use std::collections::{BTreeMap, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisContext, Analyzer};
use crate::data::{is_army_unit, unit_cost, UnitCost};
use crate::timeline::EventKind;

/// Minimum spacing between army samples in seconds.
pub const ARMY_SAMPLE_INTERVAL_SECS: f64 = 30.0;

/// Army snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArmyPoint {
    pub time: f64,
    /// Summed mineral + gas cost of live army units
    pub value: u32,
    pub unit_count: u32,
}

/// Live units of one type at the end of the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UnitCount {
    pub unit_type: String,
    pub count: u32,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArmyAnalysis {
    pub peak_army_value: u32,
    pub army_timeline: Vec<ArmyPoint>,
    /// Sorted by value, highest first
    pub unit_composition: Vec<UnitCount>,
}

struct LiveUnit {
    unit_type: String,
    cost: UnitCost,
}

#[derive(Default)]
struct ArmyRegistry {
    live: HashMap<u32, LiveUnit>,
    counts: BTreeMap<String, i64>,
}

impl ArmyRegistry {
    fn insert(&mut self, tag: u32, unit_type: &str) {
        let unit = LiveUnit { unit_type: unit_type.to_string(), cost: unit_cost(unit_type) };
        if let Some(replaced) = self.live.insert(tag, unit) {
            *self.counts.entry(replaced.unit_type).or_insert(0) -= 1;
        }
        *self.counts.entry(unit_type.to_string()).or_insert(0) += 1;
    }

    fn remove(&mut self, tag: u32) {
        if let Some(unit) = self.live.remove(&tag) {
            *self.counts.entry(unit.unit_type).or_insert(0) -= 1;
        }
    }

    fn value(&self) -> u32 {
        self.live.values().map(|u| u.cost.total()).sum()
    }

    fn composition(&self) -> Vec<UnitCount> {
        let mut composition: Vec<UnitCount> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(unit_type, &count)| {
                let count = count as u32;
                UnitCount {
                    unit_type: unit_type.clone(),
                    count,
                    value: count * unit_cost(unit_type).total(),
                }
            })
            .collect();
        composition.sort_by(|a, b| b.value.cmp(&a.value));
        composition
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArmySampler;

impl Analyzer for ArmySampler {
    type Output = ArmyAnalysis;
    const NAME: &'static str = "army";

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<ArmyAnalysis> {
        let mut registry = ArmyRegistry::default();
        let mut army_timeline = Vec::new();
        let mut peak_army_value = 0u32;
        let mut last_sample_time = 0.0;
        let mut saw_player = false;

        for evt in ctx.timeline.tracker_events() {
            let time = evt.time_secs();

            if evt.belongs_to(ctx.player_id) {
                saw_player = true;
            }

            if let Some(unit) = evt.unit() {
                if evt.kind.is_unit_birth() {
                    if unit.owner == ctx.player_id && is_army_unit(&unit.unit_type) {
                        registry.insert(unit.tag, &unit.unit_type);
                    }
                } else if evt.kind == EventKind::UnitDied {
                    registry.remove(unit.tag);
                }
            }

            if time <= ctx.duration_secs && time >= last_sample_time + ARMY_SAMPLE_INTERVAL_SECS {
                let value = registry.value();
                peak_army_value = peak_army_value.max(value);
                army_timeline.push(ArmyPoint {
                    time,
                    value,
                    unit_count: registry.live.len() as u32,
                });
                last_sample_time = time;
            }
        }

        if !saw_player {
            return None;
        }

        let unit_composition = registry.composition();
        debug!(
            player = ctx.player_id,
            samples = army_timeline.len(),
            peak_army_value,
            "army analysis done"
        );

        Some(ArmyAnalysis { peak_army_value, army_timeline, unit_composition })
    }
}
