use tauri::AppHandle;

use super::details::MatchDetails;
use super::events::emit_delete_match;
use super::model::{MatchId, MatchViewItem};
use super::summary::MatchSummary;
use super::SharedMatchList;

#[tauri::command]
pub async fn get_matches(
    state: tauri::State<'_, SharedMatchList>,
) -> Result<Vec<MatchViewItem>, String> {
    Ok(state.read().await.current_list().to_vec())
}

#[tauri::command]
pub async fn get_match_summaries(
    state: tauri::State<'_, SharedMatchList>,
) -> Result<Vec<MatchSummary>, String> {
    let match_list = state.read().await;
    Ok(match_list
        .current_list()
        .iter()
        .map(MatchSummary::from_item)
        .collect())
}

#[tauri::command]
pub async fn get_match_details(
    state: tauri::State<'_, SharedMatchList>,
    match_id: MatchId,
) -> Result<MatchDetails, String> {
    let match_list = state.read().await;
    match_list
        .get(match_id)
        .map(MatchDetails::from_item)
        .ok_or_else(|| format!("Match {match_id} not found"))
}

#[tauri::command]
pub async fn delete_match(
    app_handle: AppHandle,
    state: tauri::State<'_, SharedMatchList>,
    match_id: MatchId,
) -> Result<bool, String> {
    let removed = state.write().await.delete_match(match_id);
    emit_delete_match(&app_handle, match_id);

    Ok(removed)
}
