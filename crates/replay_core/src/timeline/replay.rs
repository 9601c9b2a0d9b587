//! Match metadata and the decoded timeline container.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::event::{EventStream, TimelineEvent};

/// Player faction as labelled by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Terran,
    Protoss,
    Zerg,
    Random,
    Unknown,
}

impl Faction {
    /// Case-insensitive parse; anything unrecognized is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "terran" | "terr" => Faction::Terran,
            "protoss" | "prot" => Faction::Protoss,
            "zerg" => Faction::Zerg,
            "random" => Faction::Random,
            _ => Faction::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Faction::Terran => "Terran",
            Faction::Protoss => "Protoss",
            Faction::Zerg => "Zerg",
            Faction::Random => "Random",
            Faction::Unknown => "Unknown",
        }
    }

    /// Single-letter label used in matchup names ("ZvP").
    pub fn initial(&self) -> char {
        self.name().chars().next().unwrap_or('?')
    }

    /// Only Zerg has the periodic inject mechanic.
    pub fn has_inject_mechanic(&self) -> bool {
        matches!(self, Faction::Zerg)
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Final result for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Undecided,
}

/// Player slot information from the replay details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// 1-based slot, matches the timeline player id
    pub slot: u32,
    pub name: String,
    pub faction: Faction,
    pub result: GameResult,
    pub is_human: bool,
}

/// Replay metadata supplied by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub map: String,
    /// Authoritative match duration in real-time seconds
    pub duration_secs: f64,
    #[serde(default)]
    pub game_version: String,
    pub players: Vec<PlayerInfo>,
}

impl MatchInfo {
    pub fn player(&self, slot: u32) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.slot == slot)
    }

    pub fn winner(&self) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.result == GameResult::Win)
    }

    pub fn loser(&self) -> Option<&PlayerInfo> {
        self.players.iter().find(|p| p.result == GameResult::Loss)
    }
}

/// The decoded event timeline of one match.
///
/// Events arrive grouped by stream (tracker events first, then game
/// events), each group ascending by tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub duration_secs: f64,
}

impl Timeline {
    pub fn new(events: Vec<TimelineEvent>, duration_secs: f64) -> Self {
        Self { events, duration_secs }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one stream, in timeline order.
    pub fn stream(&self, stream: EventStream) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.stream() == stream)
    }

    /// State and lifecycle events, in timeline order.
    pub fn tracker_events(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.stream(), EventStream::State | EventStream::Lifecycle))
    }

    /// All events merged by tick. Ties keep state/lifecycle before actions,
    /// then original order.
    pub fn chronological(&self) -> Vec<&TimelineEvent> {
        let mut merged: Vec<&TimelineEvent> = self.events.iter().collect();
        merged.sort_by_key(|e| (e.tick, e.stream() == EventStream::Action));
        merged
    }
}

/// Decoder output: metadata plus the event timeline, which is absent when
/// the decoder could not load events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReplay {
    pub info: MatchInfo,
    #[serde(default)]
    pub timeline: Option<Timeline>,
}
