use tauri::{AppHandle, Emitter};

use super::model::{MatchId, MatchViewItem};

pub const EVENT_NEW_GAME: &str = "new-game";
pub const EVENT_MATCHES_UPDATED: &str = "matches-updated";
pub const EVENT_DELETE_MATCH: &str = "delete-match";

pub(crate) fn emit_matches_updated(app_handle: &AppHandle, items: &[MatchViewItem]) {
    if let Err(error) = app_handle.emit(EVENT_MATCHES_UPDATED, items) {
        tracing::error!(item_count = items.len(), "Failed to emit matches-updated event: {error}");
    }
}

pub(crate) fn emit_delete_match(app_handle: &AppHandle, match_id: MatchId) {
    if let Err(error) = app_handle.emit(EVENT_DELETE_MATCH, match_id) {
        tracing::error!(match_id, "Failed to emit delete-match event: {error}");
    }
}
