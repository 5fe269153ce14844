#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to encode match list: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Match store lock was poisoned")]
    Poisoned,

    #[cfg(feature = "desktop")]
    #[error("Match store error: {0}")]
    Plugin(#[from] tauri_plugin_store::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
