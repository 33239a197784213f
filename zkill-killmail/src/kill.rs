//! Killmail types mirroring the RedisQ JSON payload.
//!
//! Every struct decodes leniently: missing members take their default value and
//! `null` nested blocks are treated like missing ones, because zKillboard omits
//! blocks that do not apply (a victim without alliance, a kill outside a war).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::serde_kill_time;

/// A kill as received from RedisQ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kill {
    /// Envelope around the killmail. `null` when no kill was available.
    #[serde(deserialize_with = "null_as_default")]
    pub package: KillPackage,
}

impl Kill {
    /// Check whether this is an empty "null" kill
    pub fn is_null_kill(&self) -> bool {
        self.package.id == 0
    }

    /// zKillboard ID of the kill, 0 for null kills
    pub fn id(&self) -> u64 {
        self.package.id
    }

    pub fn killmail(&self) -> &KillMail {
        &self.package.killmail
    }

    pub fn zkb(&self) -> &ZKillboardAttributes {
        &self.package.zkb
    }
}

/// The "package" layer RedisQ wraps kills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillPackage {
    #[serde(rename = "killID")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub killmail: KillMail,
    #[serde(deserialize_with = "null_as_default")]
    pub zkb: ZKillboardAttributes,
}

/// The killmail itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KillMail {
    #[serde(rename = "killID")]
    pub id: u64,
    #[serde(with = "serde_kill_time")]
    pub kill_time: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub solar_system: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub attackers: Vec<Attacker>,
    pub attacker_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub victim: Victim,
    #[serde(deserialize_with = "null_as_default")]
    pub war: War,
}

/// A single attacking party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attacker {
    #[serde(deserialize_with = "null_as_default")]
    pub character: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub corporation: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub alliance: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub faction: CommonAttributes,
    #[serde(rename = "shipType", deserialize_with = "null_as_default")]
    pub ship: CommonAttributes,
    #[serde(rename = "weaponType", deserialize_with = "null_as_default")]
    pub weapon: CommonAttributes,
    pub damage_done: u64,
    pub final_blow: bool,
    pub security_status: f64,
}

/// The victim of a kill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Victim {
    #[serde(deserialize_with = "null_as_default")]
    pub character: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub corporation: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub alliance: CommonAttributes,
    #[serde(deserialize_with = "null_as_default")]
    pub faction: CommonAttributes,
    #[serde(rename = "shipType", deserialize_with = "null_as_default")]
    pub ship: CommonAttributes,
    pub damage_taken: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    #[serde(deserialize_with = "null_as_default")]
    pub position: Position,
}

/// An item fitted to or carried by the victim, dropped or destroyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "itemType", deserialize_with = "null_as_default")]
    pub item: CommonAttributes,
    pub quantity_dropped: u64,
    pub quantity_destroyed: u64,
    pub flag: i32,
    pub singleton: i32,
}

/// Reference shared by characters, corporations, alliances, ship types and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonAttributes {
    pub id: u64,
    pub name: String,
    pub href: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: Icon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icon {
    pub href: String,
}

/// War the kill happened in. `id` is 0 outside of wars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct War {
    pub id: u64,
    pub href: String,
}

/// Position of the victim within the solar system, in meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Valuation and metadata zKillboard attaches to a kill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZKillboardAttributes {
    pub total_value: f64,
    pub points: i64,
    #[serde(rename = "locationID")]
    pub location_id: u64,
    pub hash: String,
    pub href: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
