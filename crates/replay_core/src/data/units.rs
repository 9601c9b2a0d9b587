//! # Unit Catalog
//!
//! Static unit classification and cost tables. All lookups are
//! case-insensitive substring matches on the decoder's unit type name,
//! first match wins.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Resource cost of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCost {
    pub minerals: u32,
    pub gas: u32,
}

impl UnitCost {
    pub const fn new(minerals: u32, gas: u32) -> Self {
        Self { minerals, gas }
    }

    pub fn total(&self) -> u32 {
        self.minerals + self.gas
    }
}

/// Cost used for unit types missing from the table.
pub const DEFAULT_UNIT_COST: UnitCost = UnitCost::new(50, 25);

/// Spawn Larva ability links across patches.
pub const INJECT_ABILITY_LINKS: [u32; 6] = [183, 184, 185, 2731, 2732, 2733];

static UNIT_COSTS: Lazy<Vec<(&'static str, UnitCost)>> = Lazy::new(|| {
    vec![
        // Terran
        ("marine", UnitCost::new(50, 0)),
        ("marauder", UnitCost::new(100, 25)),
        ("reaper", UnitCost::new(50, 50)),
        ("ghost", UnitCost::new(150, 125)),
        ("hellion", UnitCost::new(100, 0)),
        ("hellbat", UnitCost::new(100, 0)),
        ("widowmine", UnitCost::new(75, 25)),
        ("siegetank", UnitCost::new(150, 125)),
        ("cyclone", UnitCost::new(150, 100)),
        ("thor", UnitCost::new(300, 200)),
        ("viking", UnitCost::new(150, 75)),
        ("medivac", UnitCost::new(100, 100)),
        ("liberator", UnitCost::new(150, 150)),
        ("banshee", UnitCost::new(150, 100)),
        ("raven", UnitCost::new(100, 200)),
        ("battlecruiser", UnitCost::new(400, 300)),
        // Protoss
        ("zealot", UnitCost::new(100, 0)),
        ("stalker", UnitCost::new(125, 50)),
        ("sentry", UnitCost::new(50, 100)),
        ("adept", UnitCost::new(100, 25)),
        ("hightemplar", UnitCost::new(50, 150)),
        ("darktemplar", UnitCost::new(125, 125)),
        ("archon", UnitCost::new(0, 0)),
        ("observer", UnitCost::new(25, 75)),
        ("immortal", UnitCost::new(275, 100)),
        ("colossus", UnitCost::new(300, 200)),
        ("disruptor", UnitCost::new(150, 150)),
        ("warpprism", UnitCost::new(200, 0)),
        ("phoenix", UnitCost::new(150, 100)),
        ("voidray", UnitCost::new(250, 150)),
        ("oracle", UnitCost::new(150, 150)),
        ("tempest", UnitCost::new(250, 175)),
        ("carrier", UnitCost::new(350, 250)),
        ("mothership", UnitCost::new(400, 300)),
        // Zerg
        ("zergling", UnitCost::new(25, 0)),
        ("baneling", UnitCost::new(25, 25)),
        ("roach", UnitCost::new(75, 25)),
        ("ravager", UnitCost::new(75, 75)),
        ("hydralisk", UnitCost::new(100, 50)),
        ("lurker", UnitCost::new(100, 100)),
        ("infestor", UnitCost::new(100, 150)),
        ("swarmhost", UnitCost::new(100, 75)),
        ("ultralisk", UnitCost::new(300, 200)),
        ("mutalisk", UnitCost::new(100, 100)),
        ("corruptor", UnitCost::new(150, 100)),
        ("broodlord", UnitCost::new(150, 150)),
        ("viper", UnitCost::new(100, 200)),
        ("queen", UnitCost::new(150, 0)),
        ("overseer", UnitCost::new(50, 50)),
    ]
});

const WORKERS: [&str; 3] = ["scv", "probe", "drone"];

/// Structures that can appear as a build-order "Build" step.
static STRUCTURES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Terran
        "commandcenter", "orbitalcommand", "planetaryfortress", "supplydepot", "barracks",
        "factory", "starport", "engineeringbay", "armory", "ghostacademy", "fusioncore",
        "bunker", "missileturret", "sensortower", "refinery", "techlab", "reactor",
        // Protoss
        "nexus", "pylon", "gateway", "forge", "cyberneticscore", "roboticsfacility",
        "roboticsbay", "stargate", "fleetbeacon", "twilightcouncil", "templararchive",
        "darkshrine", "photoncannon", "shieldbattery", "assimilator",
        // Zerg
        "hatchery", "lair", "hive", "spawningpool", "evolutionchamber", "roachwarren",
        "banelingnest", "hydraliskden", "lurkerden", "spire", "greaterspire",
        "infestationpit", "ultraliscavern", "nydusnetwork", "spinecrawler", "sporecrawler",
        "extractor",
    ]
});

/// Static entities that never count as army even though they are not
/// build-order structures.
const NON_ARMY_STATICS: [&str; 3] = ["warpgate", "nyduscanal", "creeptumor"];

/// Transient or summoned units excluded from army value.
const NON_ARMY_TRANSIENTS: [&str; 6] =
    ["larva", "egg", "cocoon", "locust", "broodling", "interceptor"];

/// Units never listed in a build order.
const BUILD_ORDER_EXCLUDED: [&str; 9] = [
    "larva", "locust", "broodling", "interceptor", "autoturret", "creeptumor", "mule",
    "changeling", "infested",
];

/// Units that are listed in a build order.
const BUILD_ORDER_UNITS: [&str; 9] =
    ["scv", "probe", "drone", "queen", "zergling", "marine", "zealot", "overlord", "overseer"];

const INJECT_STRUCTURES: [&str; 3] = ["hatchery", "lair", "hive"];

const COSMETIC_UPGRADE_MARKERS: [&str; 6] = ["reward", "dance", "skin", "spray", "voice", "emote"];

fn contains_any(unit_type: &str, keys: &[&str]) -> bool {
    let lower = unit_type.to_ascii_lowercase();
    keys.iter().any(|k| lower.contains(k))
}

/// Cost lookup with [`DEFAULT_UNIT_COST`] fallback.
pub fn unit_cost(unit_type: &str) -> UnitCost {
    let lower = unit_type.to_ascii_lowercase();
    UNIT_COSTS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, cost)| *cost)
        .unwrap_or(DEFAULT_UNIT_COST)
}

pub fn is_worker(unit_type: &str) -> bool {
    contains_any(unit_type, &WORKERS)
}

pub fn is_structure(unit_type: &str) -> bool {
    contains_any(unit_type, &STRUCTURES)
}

/// Army units: everything that is not a worker, structure, or transient.
pub fn is_army_unit(unit_type: &str) -> bool {
    !unit_type.is_empty()
        && !is_worker(unit_type)
        && !is_structure(unit_type)
        && !contains_any(unit_type, &NON_ARMY_STATICS)
        && !contains_any(unit_type, &NON_ARMY_TRANSIENTS)
}

/// Units worth listing in a build order.
pub fn is_build_order_unit(unit_type: &str) -> bool {
    if contains_any(unit_type, &BUILD_ORDER_EXCLUDED) {
        return false;
    }
    contains_any(unit_type, &BUILD_ORDER_UNITS)
}

/// Structures that receive injects.
pub fn is_inject_structure(unit_type: &str) -> bool {
    contains_any(unit_type, &INJECT_STRUCTURES)
}

pub fn is_inject_ability(ability_link: u32) -> bool {
    INJECT_ABILITY_LINKS.contains(&ability_link)
}

pub fn is_cosmetic_upgrade(name: &str) -> bool {
    contains_any(name, &COSMETIC_UPGRADE_MARKERS)
}

/// Display name: faction prefix stripped, spaces at camel-case boundaries.
///
/// `"ProtossCyberneticsCore"` → `"Cybernetics Core"`,
/// `"BarracksTechLab"` → `"Barracks Tech Lab"`, `"SCV"` → `"SCV"`.
pub fn format_unit_name(name: &str) -> String {
    let mut name = name;
    for prefix in ["Terran", "Protoss", "Zerg"] {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }

    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Upgrade display name: lower-case faction words removed, then formatted
/// like a unit name.
pub fn format_upgrade_name(name: &str) -> String {
    let cleaned = name.replace("terran", "").replace("protoss", "").replace("zerg", "");
    format_unit_name(&cleaned)
}
