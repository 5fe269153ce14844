use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::duration::ticks_to_time;
use super::status::decode_status;

pub type MatchId = u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMatchRecord {
    pub id: MatchId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mod_chksum: u64,
    #[serde(default)]
    pub mod_version: u64,
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub ticks: u64,
    #[serde(default)]
    pub game: GameInfo,
    #[serde(default)]
    pub map: MapInfo,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
    #[serde(default)]
    pub observers: Vec<Value>,
    #[serde(default)]
    pub messages: Vec<MessageInfo>,
    #[serde(default)]
    pub actions: Vec<ActionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameInfo {
    pub name: String,
    pub mode: String,
    pub resources: String,
    pub locations: String,
    pub victory_points: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInfo {
    pub name: String,
    pub description: String,
    pub abbrname: String,
    pub maxplayers: u32,
    pub path: String,
    pub date: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInfo {
    pub name: String,
    pub kind: u32,
    pub team: u32,
    pub race: u64,
    pub relic_id: u64,
    pub rank: u32,
    pub cpu: u32,
    pub hero: u32,
    pub primary_color: u8,
    pub secondary_color: u8,
    pub trim_color: u8,
    pub accessory_color: u8,
    pub skin_path: String,
    pub skin_name: String,
    pub id: u32,
    pub steam_id: u64,
    pub sim_id: u64,
    pub slot: u64,
    // e.g. `Won`, `Killed`, `Dropped`
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageInfo {
    pub tick: u64,
    pub sender: String,
    pub receiver: String,
    pub body: String,
    pub player_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionInfo {
    pub relic_id: u64,
    pub name: String,
    pub tick: u64,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchViewItem {
    pub match_id: MatchId,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
    #[serde(default)]
    pub map: MapInfo,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub played_at: String,
    #[serde(default)]
    pub messages: Vec<MessageInfo>,
    #[serde(default)]
    pub actions: Vec<ActionInfo>,
}

impl MatchViewItem {
    pub fn from_raw(raw: RawMatchRecord) -> Self {
        Self {
            match_id: raw.id,
            duration: ticks_to_time(raw.ticks),
            status: decode_status(&raw.status),
            played_at: raw.date,
            players: raw.players,
            map: raw.map,
            messages: raw.messages,
            actions: raw.actions,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.get("response").and_then(Value::as_str) == Some("ok")
    }
}
