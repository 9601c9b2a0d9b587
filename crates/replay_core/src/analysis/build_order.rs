//! # Build Order Extractor
//!
//! Chronological log of structures started, relevant units trained and
//! upgrades finished during the opening.
//!
//! Every entry carries the player's supply from the latest `PlayerStats`
//! snapshot seen before it.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisContext, Analyzer};
use crate::data::{
    format_unit_name, format_upgrade_name, is_build_order_unit, is_cosmetic_upgrade,
    is_structure, is_worker,
};
use crate::timeline::EventKind;

/// Default cut-off for build order entries (8 minutes).
pub const DEFAULT_BUILD_ORDER_HORIZON_SECS: f64 = 480.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildAction {
    Build,
    Train,
    TrainWorker,
    Upgrade,
}

impl BuildAction {
    pub fn label(&self) -> &'static str {
        match self {
            BuildAction::Build => "Build",
            BuildAction::Train => "Train",
            BuildAction::TrainWorker => "Train Worker",
            BuildAction::Upgrade => "Upgrade",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BuildOrderItem {
    pub time: f64,
    pub supply: i64,
    pub action: BuildAction,
    pub unit_or_building: String,
}

#[derive(Debug, Clone, Copy)]
pub struct BuildOrderExtractor {
    pub horizon_secs: f64,
}

impl Default for BuildOrderExtractor {
    fn default() -> Self {
        Self { horizon_secs: DEFAULT_BUILD_ORDER_HORIZON_SECS }
    }
}

impl BuildOrderExtractor {
    pub fn with_horizon(horizon_secs: f64) -> Self {
        Self { horizon_secs }
    }
}

impl Analyzer for BuildOrderExtractor {
    type Output = Vec<BuildOrderItem>;
    const NAME: &'static str = "build_order";

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Option<Vec<BuildOrderItem>> {
        let mut latest_supply: HashMap<u32, i64> = HashMap::new();
        let mut items = Vec::new();
        let mut saw_player = false;

        for evt in ctx.timeline.tracker_events() {
            if evt.belongs_to(ctx.player_id) {
                saw_player = true;
            }

            let time = evt.time_secs();

            let entry = match evt.kind {
                EventKind::PlayerStats => {
                    if let (Some(player), Some(stats)) = (evt.player_id, evt.stats()) {
                        latest_supply.insert(player, stats.supply_used());
                    }
                    None
                }
                EventKind::UnitInit => evt
                    .unit()
                    .filter(|u| u.owner == ctx.player_id && is_structure(&u.unit_type))
                    .map(|u| (BuildAction::Build, format_unit_name(&u.unit_type))),
                EventKind::UnitBorn => evt
                    .unit()
                    .filter(|u| u.owner == ctx.player_id && is_build_order_unit(&u.unit_type))
                    .map(|u| {
                        let action = if is_worker(&u.unit_type) {
                            BuildAction::TrainWorker
                        } else {
                            BuildAction::Train
                        };
                        (action, format_unit_name(&u.unit_type))
                    }),
                EventKind::Upgrade if evt.player_id == Some(ctx.player_id) => evt
                    .upgrade_name()
                    .filter(|name| !name.is_empty() && !is_cosmetic_upgrade(name))
                    .map(|name| (BuildAction::Upgrade, format_upgrade_name(name))),
                _ => None,
            };

            if let Some((action, unit_or_building)) = entry {
                let supply = latest_supply.get(&ctx.player_id).copied().unwrap_or(0);
                items.push(BuildOrderItem { time, supply, action, unit_or_building });
            }
        }

        if !saw_player {
            return None;
        }

        items.sort_by(|a, b| a.time.total_cmp(&b.time));
        items.retain(|item| item.time <= self.horizon_secs);

        debug!(player = ctx.player_id, items = items.len(), "build order extracted");
        Some(items)
    }
}
