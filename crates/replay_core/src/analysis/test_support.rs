//! Timeline builders and proptest strategies shared by the analyzer tests.

use proptest::prelude::*;

use crate::timeline::{
    seconds_to_ticks, Faction, Payload, PayloadValue, Timeline, TimelineEvent, FIXED_POINT_SCALE,
};

use super::AnalysisContext;

pub const EPS: f64 = 1e-6;

fn entries(pairs: Vec<(&str, PayloadValue)>) -> Payload {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn fixed(value: f64) -> PayloadValue {
    PayloadValue::Int((value * FIXED_POINT_SCALE as f64).round() as i64)
}

/// `PlayerStats` with supply figures only.
pub fn supply_event(time_secs: f64, player: u32, used: i64, max: i64) -> TimelineEvent {
    let stats = entries(vec![
        ("scoreValueFoodUsed", fixed(used as f64)),
        ("scoreValueFoodMade", fixed(max as f64)),
    ]);
    TimelineEvent::from_raw(
        seconds_to_ticks(time_secs),
        "PlayerStats",
        None,
        entries(vec![
            ("playerId", PayloadValue::Int(player as i64)),
            ("stats", PayloadValue::Map(stats)),
        ]),
    )
}

/// `PlayerStats` with resource figures only. Rates are given unscaled.
pub fn resource_event(
    time_secs: f64,
    player: u32,
    minerals: i64,
    gas: i64,
    mineral_rate: f64,
    gas_rate: f64,
) -> TimelineEvent {
    let stats = entries(vec![
        ("scoreValueMineralsCurrent", PayloadValue::Int(minerals)),
        ("scoreValueVespeneCurrent", PayloadValue::Int(gas)),
        ("scoreValueMineralsCollectionRate", fixed(mineral_rate)),
        ("scoreValueVespeneCollectionRate", fixed(gas_rate)),
    ]);
    TimelineEvent::from_raw(
        seconds_to_ticks(time_secs),
        "PlayerStats",
        Some(player),
        entries(vec![("stats", PayloadValue::Map(stats))]),
    )
}

/// Unit lifecycle event (`UnitBorn`, `UnitInit`, `UnitDone`, `UnitDied`).
pub fn unit_event(
    time_secs: f64,
    kind: &str,
    owner: u32,
    unit_type: &str,
    tag: u32,
) -> TimelineEvent {
    let mut payload = entries(vec![("unitTagIndex", PayloadValue::Int(tag as i64))]);
    if owner > 0 {
        payload.insert("controlPlayerId".into(), PayloadValue::Int(owner as i64));
    }
    if !unit_type.is_empty() {
        payload.insert("unitTypeName".into(), PayloadValue::Str(unit_type.into()));
    }
    TimelineEvent::from_raw(seconds_to_ticks(time_secs), kind, None, payload)
}

pub fn upgrade_event(time_secs: f64, player: u32, name: &str) -> TimelineEvent {
    TimelineEvent::from_raw(
        seconds_to_ticks(time_secs),
        "Upgrade",
        None,
        entries(vec![
            ("playerId", PayloadValue::Int(player as i64)),
            ("upgradeTypeName", PayloadValue::Str(name.into())),
        ]),
    )
}

/// `Cmd` with an ability link.
pub fn command_event(time_secs: f64, player: u32, ability_link: u32) -> TimelineEvent {
    let abil = entries(vec![("abilLink", PayloadValue::Int(ability_link as i64))]);
    TimelineEvent::from_raw(
        seconds_to_ticks(time_secs),
        "Cmd",
        Some(player),
        entries(vec![("abil", PayloadValue::Map(abil))]),
    )
}

/// Payload-free game event at an exact tick.
pub fn action_at_tick(tick: u32, kind: &str, player: u32) -> TimelineEvent {
    TimelineEvent::from_raw(tick, kind, Some(player), Payload::new())
}

/// Tracker events first, then game events, each ascending, as the
/// decoder emits them.
pub fn timeline(mut events: Vec<TimelineEvent>, duration_secs: f64) -> Timeline {
    events.sort_by_key(|e| (e.stream() == crate::timeline::EventStream::Action, e.tick));
    Timeline::new(events, duration_secs)
}

pub fn context(timeline: &Timeline, player_id: u32, faction: Faction) -> AnalysisContext<'_> {
    AnalysisContext::new(timeline, player_id, faction, timeline.duration_secs)
}

/// Random supply series: (time, used, max) with ascending whole-second times.
pub fn arb_supply_series() -> impl Strategy<Value = Vec<(f64, i64, i64)>> {
    prop::collection::vec((1u32..20, 0i64..=200, 0i64..=200), 0..60).prop_map(|steps| {
        let mut time = 0.0;
        steps
            .into_iter()
            .map(|(gap, used, max)| {
                time += gap as f64;
                (time, used, max)
            })
            .collect()
    })
}

/// Random resource samples: (minerals, gas, mineral rate, gas rate).
pub fn arb_resource_samples() -> impl Strategy<Value = Vec<(i64, i64, f64, f64)>> {
    prop::collection::vec((0i64..5000, 0i64..3000, 0.0f64..4000.0, 0.0f64..2000.0), 0..40)
}

/// Random ascending action ticks with mixed kinds.
pub fn arb_action_ticks() -> impl Strategy<Value = Vec<(u32, &'static str)>> {
    let kinds = prop::sample::select(vec![
        "Cmd",
        "SelectionDelta",
        "ControlGroupUpdate",
        "CmdUpdateTargetPoint",
        "CameraUpdate",
    ]);
    prop::collection::vec((0u32..40, kinds), 0..200).prop_map(|steps| {
        let mut tick = 0;
        steps
            .into_iter()
            .map(|(gap, kind)| {
                tick += gap;
                (tick, kind)
            })
            .collect()
    })
}

/// Random ascending inject cast times in seconds, with a structure count.
pub fn arb_inject_casts() -> impl Strategy<Value = (Vec<f64>, u32)> {
    let casts = prop::collection::vec(1u32..120, 0..30).prop_map(|gaps| {
        let mut time = 0.0;
        gaps.into_iter()
            .map(|gap| {
                time += gap as f64;
                time
            })
            .collect::<Vec<f64>>()
    });
    (casts, 1u32..4)
}
