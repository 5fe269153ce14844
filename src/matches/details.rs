use serde::Serialize;

use super::duration::ticks_to_time;
use super::model::{ActionInfo, MatchId, MatchViewItem, MessageInfo};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    pub match_id: MatchId,
    pub messages: Vec<MessageRow>,
    pub actions: Vec<ActionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRow {
    pub time: String,
    pub sender: String,
    pub receiver: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    pub relic_id: u64,
    pub name: String,
    pub time: String,
    pub action_type: &'static str,
    pub player_location: String,
    pub action_counters: String,
    pub action_context: String,
    pub item_id: String,
    pub data: Vec<u64>,
}

impl MatchDetails {
    pub fn from_item(item: &MatchViewItem) -> Self {
        Self {
            match_id: item.match_id,
            messages: item.messages.iter().map(MessageRow::from_message).collect(),
            actions: item.actions.iter().map(ActionRow::from_action).collect(),
        }
    }
}

impl MessageRow {
    fn from_message(message: &MessageInfo) -> Self {
        Self {
            time: ticks_to_time(message.tick),
            sender: message.sender.clone(),
            receiver: message.receiver.clone(),
            body: message.body.clone(),
        }
    }
}

impl ActionRow {
    fn from_action(action: &ActionInfo) -> Self {
        let data = &action.data;
        Self {
            relic_id: action.relic_id,
            name: action.name.clone(),
            time: ticks_to_time(action.tick),
            action_type: action_type_label(data.first().copied()),
            player_location: data_at(data, 1),
            action_counters: format!("{} | {}", data_at(data, 4), data_at(data, 5)),
            action_context: format!("{} | {}", data_at(data, 10), data_at(data, 11)),
            item_id: data_at(data, 12),
            data: data.clone(),
        }
    }
}

pub fn action_type_label(code: Option<u64>) -> &'static str {
    match code {
        None => "",
        Some(3) => "Build unit",
        Some(5) => "Cancel unit or wargear",
        Some(15) => "Upgrade Building",
        Some(47) => "Capture Point",
        Some(49) => "Reinforce unit",
        Some(50) => "Purchase wargear",
        Some(51) => "Cancel wargear purchase",
        Some(78) => "Place building",
        Some(85) => "Global ability",
        Some(_) => "unknown",
    }
}

fn data_at(data: &[u64], index: usize) -> String {
    data.get(index)
        .map(|value| value.to_string())
        .unwrap_or_default()
}
