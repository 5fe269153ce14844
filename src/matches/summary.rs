use serde::Serialize;

use super::model::{MatchId, MatchViewItem, PlayerInfo};

const PVP_MAP_PREFIX: &str = "DATA:maps\\pvp\\";
const WINNING_PLAYER_STATUS: &str = "Won";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub team_one: String,
    pub team_two: String,
    pub winner: u32,
    pub map_name: String,
    pub duration: String,
    pub played_at: String,
    pub ok: bool,
}

impl MatchSummary {
    pub fn from_item(item: &MatchViewItem) -> Self {
        Self {
            match_id: item.match_id,
            team_one: team_names(&item.players, 0),
            team_two: team_names(&item.players, 1),
            winner: winning_team(&item.players),
            map_name: short_map_name(&item.map.path),
            duration: item.duration.clone(),
            played_at: item.played_at.clone(),
            ok: item.is_ok(),
        }
    }
}

fn team_names(players: &[PlayerInfo], team: u32) -> String {
    players
        .iter()
        .filter(|player| player.team == team)
        .map(|player| player.name.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

fn winning_team(players: &[PlayerInfo]) -> u32 {
    players
        .iter()
        .find(|player| player.status == WINNING_PLAYER_STATUS)
        .map(|player| player.team)
        .unwrap_or(0)
}

fn short_map_name(path: &str) -> String {
    path.replacen(PVP_MAP_PREFIX, "", 1)
}
