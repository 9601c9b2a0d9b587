//! Matchup-specific coaching tips keyed by (loser faction, winner faction).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timeline::Faction;

/// Tips for one matchup, grouped by game phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchupTips {
    pub opening: Vec<String>,
    pub mid_game: Vec<String>,
    pub timing: Vec<String>,
    pub late_game: Vec<String>,
}

impl MatchupTips {
    fn from_lists(
        opening: &[&str],
        mid_game: &[&str],
        timing: &[&str],
        late_game: &[&str],
    ) -> Self {
        let owned = |lines: &[&str]| lines.iter().map(|s| s.to_string()).collect();
        Self {
            opening: owned(opening),
            mid_game: owned(mid_game),
            timing: owned(timing),
            late_game: owned(late_game),
        }
    }
}

static MATCHUP_TIPS: Lazy<HashMap<(Faction, Faction), MatchupTips>> = Lazy::new(|| {
    let mut tips = HashMap::new();

    tips.insert(
        (Faction::Protoss, Faction::Zerg),
        MatchupTips::from_lists(
            &[
                "Standard: Gateway, Nexus, Cybernetics Core, then Stargate or Robo",
                "Scout with an Adept shade or the first Stalker",
                "Wall off early against Zerglings",
            ],
            &[
                "Against Roach/Ravager: Immortals and Chargelots",
                "Against Hydralisks: Psionic Storm is essential",
                "Against Mutalisks: Phoenixes or fast Archons",
            ],
            &[
                "Two-base Immortal/Archon all-in around 7:30",
                "Or an eight-Gateway Chargelot timing around 6:00",
                "Attack before Hive tech is up",
            ],
            &[
                "Carrier/Tempest with Storm and Archons",
                "Needs strong upgrades (3/3)",
                "Avoid big fights without Storm",
            ],
        ),
    );

    tips.insert(
        (Faction::Zerg, Faction::Protoss),
        MatchupTips::from_lists(
            &[
                "Hatch first is standard against Protoss",
                "Speedlings can apply early pressure",
                "Overlord scout at 3:00-3:30",
            ],
            &[
                "Roach/Ravager against Immortal/Archon",
                "Lurkers against ground armies",
                "Mutalisks when Protoss lacks anti-air",
            ],
            &[
                "Roach/Ravager timing around 5:00",
                "Ling/Bane all-in against greedy builds",
            ],
            &[
                "Brood Lord/Corruptor/Viper deathball",
                "Infestors against Carriers",
                "Always respect splash damage",
            ],
        ),
    );

    tips.insert(
        (Faction::Terran, Faction::Zerg),
        MatchupTips::from_lists(
            &[
                "Reaper scout into Command Center first is common",
                "Hellion harass to kill Drones",
                "Wall off against Zerglings",
            ],
            &[
                "Marine/Tank against Roach/Hydra",
                "Liberators against Mutalisks",
                "Hellbats against Ling/Bane",
            ],
            &["2-1-1 push with Medivacs around 5:30", "Or a three Command Center macro game"],
            &["Ghost/Liberator/Thor composition", "Vikings and Thors against Brood Lords"],
        ),
    );

    tips.insert(
        (Faction::Zerg, Faction::Terran),
        MatchupTips::from_lists(
            &[
                "Three Hatcheries before Pool is often good",
                "Ling/Bane against Hellions",
                "Scout for Banshees and Liberators",
            ],
            &["Classic Ling/Bane/Muta", "Or Roach/Ravager/Hydra"],
            &["Two-base Ling/Bane timing", "Roach/Ravager all-in around 4:30"],
            &["Ultralisks and Vipers against mech", "Infestors against bio"],
        ),
    );

    tips.insert(
        (Faction::Protoss, Faction::Terran),
        MatchupTips::from_lists(
            &[
                "Gateway expand is standard",
                "Robo or Stargate tech",
                "Scout for proxy Barracks",
            ],
            &[
                "Chargelot/Archon/Immortal core",
                "Add Colossi or Disruptors",
                "Storm against bio",
            ],
            &["Blink Stalker timing around 5:00", "Chargelot all-in against mech"],
            &["Carrier/Tempest with a strong economy", "Feedback against Ghosts"],
        ),
    );

    tips.insert(
        (Faction::Terran, Faction::Protoss),
        MatchupTips::from_lists(
            &[
                "Reaper expand is common",
                "Factory for Cyclone or Tank",
                "Scout for Dark Templar and Oracles",
            ],
            &[
                "Bio with Medivacs and Ghosts",
                "Widow Mines against Chargelots",
                "Liberators for zone control",
            ],
            &["Stim timing around 5:30", "Liberator harass"],
            &["Ghosts are essential", "Vikings against Carriers"],
        ),
    );

    tips
});

static FALLBACK_TIPS: Lazy<MatchupTips> = Lazy::new(|| {
    MatchupTips::from_lists(
        &[
            "Use a standard opening for your faction",
            "Scout early to spot cheese",
        ],
        &["Focus on solid macro", "Produce units continuously"],
        &["Attack when you have an advantage", "Time attacks around tech switches"],
        &["Upgrades are decisive", "Control the map"],
    )
});

/// Tips for `loser` playing against `winner`. Mirror and unknown matchups
/// get generic advice.
pub fn matchup_tips(loser: Faction, winner: Faction) -> MatchupTips {
    MATCHUP_TIPS
        .get(&(loser, winner))
        .cloned()
        .unwrap_or_else(|| FALLBACK_TIPS.clone())
}

/// Short matchup label such as `"ZvP"`.
pub fn matchup_label(loser: Faction, winner: Faction) -> String {
    format!("{}v{}", loser.initial(), winner.initial())
}
