pub mod matches;
pub mod settings;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::{AppHandle, Manager, RunEvent};
    use tokio::sync::RwLock;
    use tracing_subscriber::EnvFilter;

    use crate::matches::error::StoreError;
    use crate::matches::store::{ConfiguredMatchStore, PluginMatchStore};
    use crate::matches::{
        commands, events, ingest, AppMatchStore, MatchList, MemoryMatchStore, PersistenceBridge,
        SharedMatchList,
    };
    use crate::settings::MatchListSettings;

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        init_tracing();
        let settings = MatchListSettings::from_env();

        tracing::info!(
            store_file = %settings.store_file,
            store_key = %settings.store_key,
            persist = settings.persist,
            "Starting replay companion"
        );

        let app = tauri::Builder::default()
            .plugin(tauri_plugin_window_state::Builder::default().build())
            .plugin(tauri_plugin_store::Builder::default().build())
            .setup(move |app| {
                let store = open_match_store(app.handle(), &settings)?;
                let mut match_list =
                    MatchList::new(PersistenceBridge::new(store, settings.store_key.clone()));

                let app_handle = app.handle().clone();
                match_list.subscribe(move |items| {
                    events::emit_matches_updated(&app_handle, items);
                });

                let match_list: SharedMatchList = Arc::new(RwLock::new(match_list));
                app.manage(Arc::clone(&match_list));
                ingest::start_ingestion(app.handle(), match_list);

                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::get_matches,
                commands::get_match_summaries,
                commands::get_match_details,
                commands::delete_match,
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri application");

        app.run(|app_handle, event| {
            if let RunEvent::Exit = event {
                flush_match_list(app_handle);
            }
        });
    }

    fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        if let Err(error) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
            eprintln!("Failed to install tracing subscriber: {error}");
        }
    }

    fn open_match_store(
        app_handle: &AppHandle,
        settings: &MatchListSettings,
    ) -> Result<AppMatchStore, StoreError> {
        if !settings.persist {
            tracing::info!("Match persistence disabled, keeping matches in memory");
            return Ok(ConfiguredMatchStore::Memory(MemoryMatchStore::new()));
        }

        let store = PluginMatchStore::open(app_handle, &settings.store_file)?;
        Ok(ConfiguredMatchStore::Plugin(store))
    }

    fn flush_match_list(app_handle: &AppHandle) {
        let Some(match_list) = app_handle.try_state::<SharedMatchList>() else {
            return;
        };
        let match_list = Arc::clone(match_list.inner());

        tauri::async_runtime::block_on(async move {
            match_list.write().await.flush().await;
        });
        tracing::debug!("Flushed pending match list saves");
    }
}
