// ── Reading registry ──
//
// The named values a dashboard shows for one controller. Each entry is a
// descriptor plus a plain function pointer that pulls its value out of a
// `Snapshot`; adding a reading is one table row.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::model::Snapshot;

/// Stable identifier of a reading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReadingKey {
    Online,
    PitTemp,
    PitSetTemp,
    #[strum(serialize = "meat_temp1")]
    #[serde(rename = "meat_temp1")]
    MeatTemp1,
    #[strum(serialize = "meat_temp2")]
    #[serde(rename = "meat_temp2")]
    MeatTemp2,
    #[strum(serialize = "meat_temp3")]
    #[serde(rename = "meat_temp3")]
    MeatTemp3,
    FanSpeed,
}

/// What kind of value a reading carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    /// One of a fixed set of labels.
    Enum(&'static [&'static str]),
    Temperature,
    Percentage,
}

/// A reading's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(i32),
    State(&'static str),
}

impl std::fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::State(s) => f.write_str(s),
        }
    }
}

pub const ONLINE: &str = "Online";
pub const OFFLINE: &str = "Offline";

/// Static description of one reading.
#[derive(Debug, Clone, Copy)]
pub struct ReadingDescriptor {
    pub key: ReadingKey,
    /// Identifier for dashboard entity registries.
    pub unique_id: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub kind: ReadingKind,
    pub extract: fn(&Snapshot) -> Option<ReadingValue>,
}

fn online_state(snap: &Snapshot) -> Option<ReadingValue> {
    Some(ReadingValue::State(if snap.online { ONLINE } else { OFFLINE }))
}

/// Every reading, in display order.
pub static READINGS: [ReadingDescriptor; 7] = [
    ReadingDescriptor {
        key: ReadingKey::Online,
        unique_id: "flame_boss_online",
        name: "Online",
        unit: None,
        kind: ReadingKind::Enum(&[ONLINE, OFFLINE]),
        extract: online_state,
    },
    ReadingDescriptor {
        key: ReadingKey::PitTemp,
        unique_id: "flame_boss_pit_temp",
        name: "Pit Temp",
        unit: Some("°F"),
        kind: ReadingKind::Temperature,
        extract: |s| s.pit_temp.map(ReadingValue::Number),
    },
    ReadingDescriptor {
        key: ReadingKey::PitSetTemp,
        unique_id: "flame_boss_pit_set_temp",
        name: "Pit Set Temp",
        unit: Some("°F"),
        kind: ReadingKind::Temperature,
        extract: |s| s.pit_set_temp.map(ReadingValue::Number),
    },
    ReadingDescriptor {
        key: ReadingKey::MeatTemp1,
        unique_id: "flame_boss_meat_temp_1",
        name: "Meat Temp 1",
        unit: Some("°F"),
        kind: ReadingKind::Temperature,
        extract: |s| s.meat_temp1.map(ReadingValue::Number),
    },
    ReadingDescriptor {
        key: ReadingKey::MeatTemp2,
        unique_id: "flame_boss_meat_temp_2",
        name: "Meat Temp 2",
        unit: Some("°F"),
        kind: ReadingKind::Temperature,
        extract: |s| s.meat_temp2.map(ReadingValue::Number),
    },
    ReadingDescriptor {
        key: ReadingKey::MeatTemp3,
        unique_id: "flame_boss_meat_temp_3",
        name: "Meat Temp 3",
        unit: Some("°F"),
        kind: ReadingKind::Temperature,
        extract: |s| s.meat_temp3.map(ReadingValue::Number),
    },
    ReadingDescriptor {
        key: ReadingKey::FanSpeed,
        unique_id: "flame_boss_fan_speed",
        name: "Fan Speed",
        unit: Some("%"),
        kind: ReadingKind::Percentage,
        extract: |s| s.fan_duty_percent.map(ReadingValue::Number),
    },
];

/// Look up a descriptor by key.
#[allow(clippy::as_conversions)]
pub fn descriptor(key: ReadingKey) -> &'static ReadingDescriptor {
    // One row per key, in declaration order.
    &READINGS[key as usize]
}

/// A descriptor paired with its value for one snapshot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reading {
    pub key: ReadingKey,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub value: Option<ReadingValue>,
}

impl Reading {
    pub fn descriptor(&self) -> &'static ReadingDescriptor {
        descriptor(self.key)
    }
}

/// Evaluate every reading against a snapshot.
pub fn readings(snapshot: &Snapshot) -> Vec<Reading> {
    READINGS
        .iter()
        .map(|d| Reading {
            key: d.key,
            name: d.name,
            unit: d.unit,
            value: (d.extract)(snapshot),
        })
        .collect()
}
