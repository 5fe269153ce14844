use std::sync::Arc;

use tauri::{AppHandle, Listener};
use tokio::sync::mpsc;

use super::events::EVENT_NEW_GAME;
use super::store::load_matches;
use super::SharedMatchList;

// Payloads are applied one at a time by a single task. Restore runs
// concurrently; the list buffers anything that arrives before it.
pub(crate) fn start_ingestion(app_handle: &AppHandle, match_list: SharedMatchList) {
    let (payload_tx, payload_rx) = mpsc::unbounded_channel::<String>();

    app_handle.listen(EVENT_NEW_GAME, move |event| {
        if payload_tx.send(event.payload().to_string()).is_err() {
            tracing::debug!("Match ingestion receiver dropped");
        }
    });

    tauri::async_runtime::spawn(restore_persisted_matches(Arc::clone(&match_list)));
    tauri::async_runtime::spawn(ingest_payloads(match_list, payload_rx));
}

async fn restore_persisted_matches(match_list: SharedMatchList) {
    let (store, store_key) = {
        let list = match_list.read().await;
        let persistence = list.persistence();
        (persistence.store(), persistence.key().to_string())
    };

    let baseline = load_matches(store.as_ref(), &store_key).await;
    match_list.write().await.restore(baseline);
}

async fn ingest_payloads(
    match_list: SharedMatchList,
    mut payload_rx: mpsc::UnboundedReceiver<String>,
) {
    while let Some(payload) = payload_rx.recv().await {
        match_list.write().await.on_payload(&payload);
    }

    tracing::debug!("Match ingestion channel closed");
}
