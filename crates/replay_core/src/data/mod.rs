//! # Static Game Data
//!
//! Immutable lookup tables built on first use.
//!
//! - `units` - unit costs and unit/structure classification
//! - `matchup_tips` - coaching tips per faction pairing

pub mod matchup_tips;
pub mod units;

pub use matchup_tips::{matchup_label, matchup_tips, MatchupTips};
pub use units::{
    format_unit_name, format_upgrade_name, is_army_unit, is_build_order_unit,
    is_cosmetic_upgrade, is_inject_ability, is_inject_structure, is_structure, is_worker,
    unit_cost, UnitCost, DEFAULT_UNIT_COST, INJECT_ABILITY_LINKS,
};
