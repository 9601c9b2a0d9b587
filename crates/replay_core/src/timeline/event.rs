//! # Timeline Events
//!
//! Typed view over the decoder's loosely structured events.
//!
//! The decoder hands over `(tick, kind name, player id, key/value payload)`.
//! [`TimelineEvent::from_raw`] pulls the fields the analyzers rely on into a
//! tagged union ([`EventData`]) and keeps every other key in a fallback bag
//! so new decoder fields never need a change here.
//!
//! Missing or mistyped fields degrade to zero / empty values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ticks_to_seconds;

/// Fixed-point scale of the food and collection-rate stats.
pub const FIXED_POINT_SCALE: i64 = 4096;

/// Heterogeneous payload value as produced by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PayloadValue>),
    Map(BTreeMap<String, PayloadValue>),
}

/// Ordered key → value payload.
pub type Payload = BTreeMap<String, PayloadValue>;

impl PayloadValue {
    /// Integer view. Floats truncate toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PayloadValue::Int(v) => Some(*v),
            PayloadValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PayloadValue::Int(v) => Some(*v as f64),
            PayloadValue::Float(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, PayloadValue>> {
        match self {
            PayloadValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Sub-stream an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventStream {
    /// Periodic per-player snapshots
    State,
    /// Unit/structure birth, death, morph and upgrade completion
    Lifecycle,
    /// Discrete player commands
    Action,
    /// Anything the analyzers do not read
    Other,
}

/// Event kind as named by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    PlayerStats,
    UnitBorn,
    UnitInit,
    UnitDone,
    UnitDied,
    UnitTypeChange,
    Upgrade,
    Cmd,
    CmdUpdateTargetPoint,
    CmdUpdateTargetUnit,
    SelectionDelta,
    ControlGroupUpdate,
    CameraUpdate,
    CommandManagerState,
    Other(String),
}

impl EventKind {
    pub fn name(&self) -> &str {
        match self {
            EventKind::PlayerStats => "PlayerStats",
            EventKind::UnitBorn => "UnitBorn",
            EventKind::UnitInit => "UnitInit",
            EventKind::UnitDone => "UnitDone",
            EventKind::UnitDied => "UnitDied",
            EventKind::UnitTypeChange => "UnitTypeChange",
            EventKind::Upgrade => "Upgrade",
            EventKind::Cmd => "Cmd",
            EventKind::CmdUpdateTargetPoint => "CmdUpdateTargetPoint",
            EventKind::CmdUpdateTargetUnit => "CmdUpdateTargetUnit",
            EventKind::SelectionDelta => "SelectionDelta",
            EventKind::ControlGroupUpdate => "ControlGroupUpdate",
            EventKind::CameraUpdate => "CameraUpdate",
            EventKind::CommandManagerState => "CommandManagerState",
            EventKind::Other(name) => name,
        }
    }

    pub fn stream(&self) -> EventStream {
        match self {
            EventKind::PlayerStats => EventStream::State,
            EventKind::UnitBorn
            | EventKind::UnitInit
            | EventKind::UnitDone
            | EventKind::UnitDied
            | EventKind::UnitTypeChange
            | EventKind::Upgrade => EventStream::Lifecycle,
            EventKind::Cmd
            | EventKind::CmdUpdateTargetPoint
            | EventKind::CmdUpdateTargetUnit
            | EventKind::SelectionDelta
            | EventKind::ControlGroupUpdate
            | EventKind::CameraUpdate
            | EventKind::CommandManagerState => EventStream::Action,
            EventKind::Other(_) => EventStream::Other,
        }
    }

    /// Whether the kind counts toward APM. Camera moves do not.
    pub fn is_countable_action(&self) -> bool {
        matches!(
            self,
            EventKind::Cmd
                | EventKind::CmdUpdateTargetPoint
                | EventKind::CmdUpdateTargetUnit
                | EventKind::SelectionDelta
                | EventKind::ControlGroupUpdate
        )
    }

    /// Unit birth as seen by the army registry.
    pub fn is_unit_birth(&self) -> bool {
        matches!(self, EventKind::UnitBorn | EventKind::UnitDone)
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "PlayerStats" => EventKind::PlayerStats,
            "UnitBorn" => EventKind::UnitBorn,
            "UnitInit" => EventKind::UnitInit,
            "UnitDone" => EventKind::UnitDone,
            "UnitDied" => EventKind::UnitDied,
            "UnitTypeChange" => EventKind::UnitTypeChange,
            "Upgrade" => EventKind::Upgrade,
            "Cmd" => EventKind::Cmd,
            "CmdUpdateTargetPoint" => EventKind::CmdUpdateTargetPoint,
            "CmdUpdateTargetUnit" => EventKind::CmdUpdateTargetUnit,
            "SelectionDelta" => EventKind::SelectionDelta,
            "ControlGroupUpdate" => EventKind::ControlGroupUpdate,
            "CameraUpdate" => EventKind::CameraUpdate,
            "CommandManagerState" => EventKind::CommandManagerState,
            _ => EventKind::Other(name),
        }
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        EventKind::from(name.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.name().to_string()
    }
}

/// Per-player score snapshot. Food and rate fields are fixed-point ×4096,
/// the two `*_current` fields are plain resource counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub food_used: f64,
    pub food_made: f64,
    pub minerals_current: f64,
    pub vespene_current: f64,
    pub minerals_collection_rate: f64,
    pub vespene_collection_rate: f64,
}

impl PlayerStats {
    /// Integer supply in use.
    pub fn supply_used(&self) -> i64 {
        (self.food_used.trunc() as i64) / FIXED_POINT_SCALE
    }

    /// Integer supply cap.
    pub fn supply_max(&self) -> i64 {
        (self.food_made.trunc() as i64) / FIXED_POINT_SCALE
    }

    pub fn mineral_income(&self) -> f64 {
        self.minerals_collection_rate / FIXED_POINT_SCALE as f64
    }

    pub fn gas_income(&self) -> f64 {
        self.vespene_collection_rate / FIXED_POINT_SCALE as f64
    }
}

/// Unit lifecycle fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitLifecycle {
    /// Owning player (0 when the decoder gave none)
    pub owner: u32,
    pub unit_type: String,
    pub tag: u32,
}

/// Command fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub ability_link: Option<u32>,
}

/// Typed payload, one variant per event family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventData {
    Stats(PlayerStats),
    Unit(UnitLifecycle),
    Upgrade { name: String },
    Command(CommandInfo),
    None,
}

/// One decoded timeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Game loop
    pub tick: u32,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<u32>,
    pub data: EventData,
    /// Keys not consumed by `data`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: Payload,
}

const STATS_KEYS: [&str; 6] = [
    "scoreValueFoodUsed",
    "scoreValueFoodMade",
    "scoreValueMineralsCurrent",
    "scoreValueVespeneCurrent",
    "scoreValueMineralsCollectionRate",
    "scoreValueVespeneCollectionRate",
];

/// Owner keys, checked in order.
const OWNER_KEYS: [&str; 2] = ["controlPlayerId", "upkeepPlayerId"];

impl TimelineEvent {
    /// Normalize a raw decoder event.
    pub fn from_raw(
        tick: u32,
        kind: impl Into<EventKind>,
        player_id: Option<u32>,
        mut payload: Payload,
    ) -> Self {
        let kind = kind.into();
        let mut player_id = player_id;

        let data = match kind {
            EventKind::PlayerStats => {
                if player_id.is_none() {
                    player_id = take_u32(&mut payload, "playerId");
                }
                EventData::Stats(take_stats(&mut payload))
            }
            EventKind::UnitBorn
            | EventKind::UnitInit
            | EventKind::UnitDone
            | EventKind::UnitDied
            | EventKind::UnitTypeChange => EventData::Unit(take_unit(&mut payload)),
            EventKind::Upgrade => {
                if player_id.is_none() {
                    player_id = take_u32(&mut payload, "playerId");
                }
                let name = take_string(&mut payload, "upgradeTypeName");
                EventData::Upgrade { name }
            }
            EventKind::Cmd | EventKind::CmdUpdateTargetPoint | EventKind::CmdUpdateTargetUnit => {
                EventData::Command(take_command(&mut payload))
            }
            _ => EventData::None,
        };

        Self { tick, kind, player_id, data, extra: payload }
    }

    /// Real-time seconds since match start.
    pub fn time_secs(&self) -> f64 {
        ticks_to_seconds(self.tick)
    }

    pub fn stream(&self) -> EventStream {
        self.kind.stream()
    }

    pub fn stats(&self) -> Option<&PlayerStats> {
        match &self.data {
            EventData::Stats(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&UnitLifecycle> {
        match &self.data {
            EventData::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn upgrade_name(&self) -> Option<&str> {
        match &self.data {
            EventData::Upgrade { name } => Some(name),
            _ => None,
        }
    }

    pub fn ability_link(&self) -> Option<u32> {
        match &self.data {
            EventData::Command(cmd) => cmd.ability_link,
            _ => None,
        }
    }

    /// Ownership: unit events by owner field, everything else by player id.
    pub fn belongs_to(&self, player_id: u32) -> bool {
        match &self.data {
            EventData::Unit(unit) => unit.owner == player_id,
            _ => self.player_id == Some(player_id),
        }
    }
}

fn take_u32(payload: &mut Payload, key: &str) -> Option<u32> {
    match payload.get(key).and_then(PayloadValue::as_i64) {
        Some(v) => {
            payload.remove(key);
            u32::try_from(v).ok()
        }
        None => None,
    }
}

fn take_string(payload: &mut Payload, key: &str) -> String {
    match payload.remove(key) {
        Some(PayloadValue::Str(s)) => s,
        Some(other) => {
            payload.insert(key.to_string(), other);
            String::new()
        }
        None => String::new(),
    }
}

fn take_stats(payload: &mut Payload) -> PlayerStats {
    let Some(PayloadValue::Map(mut stats)) = payload.remove("stats") else {
        return PlayerStats::default();
    };

    let mut values = [0.0f64; 6];
    for (slot, key) in values.iter_mut().zip(STATS_KEYS) {
        if let Some(v) = stats.get(key).and_then(PayloadValue::as_f64) {
            *slot = v;
            stats.remove(key);
        }
    }

    if !stats.is_empty() {
        payload.insert("stats".to_string(), PayloadValue::Map(stats));
    }

    PlayerStats {
        food_used: values[0],
        food_made: values[1],
        minerals_current: values[2],
        vespene_current: values[3],
        minerals_collection_rate: values[4],
        vespene_collection_rate: values[5],
    }
}

fn take_unit(payload: &mut Payload) -> UnitLifecycle {
    let mut owner = 0;
    for key in OWNER_KEYS {
        if let Some(v) = payload.get(key).and_then(PayloadValue::as_i64) {
            owner = u32::try_from(v).unwrap_or(0);
            break;
        }
    }
    for key in OWNER_KEYS {
        if payload.get(key).and_then(PayloadValue::as_i64).is_some() {
            payload.remove(key);
        }
    }

    let unit_type = take_string(payload, "unitTypeName");
    let tag = take_u32(payload, "unitTagIndex").unwrap_or(0);

    UnitLifecycle { owner, unit_type, tag }
}

fn take_command(payload: &mut Payload) -> CommandInfo {
    let ability_link = payload
        .get("abil")
        .and_then(PayloadValue::as_map)
        .and_then(|abil| abil.get("abilLink"))
        .and_then(PayloadValue::as_i64)
        .and_then(|v| u32::try_from(v).ok());

    CommandInfo { ability_link }
}
