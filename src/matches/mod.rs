pub mod details;
pub mod duration;
pub mod error;
pub mod list;
pub mod model;
pub mod status;
pub mod store;
pub mod summary;

#[cfg(feature = "desktop")]
pub(crate) mod commands;
#[cfg(feature = "desktop")]
pub mod events;
#[cfg(feature = "desktop")]
pub(crate) mod ingest;

pub use list::{MatchList, SubscriptionId};
pub use model::{MatchId, MatchViewItem, RawMatchRecord};
pub use store::{MatchStore, MemoryMatchStore, PersistenceBridge};

#[cfg(feature = "desktop")]
pub type AppMatchStore = store::ConfiguredMatchStore<tauri::Wry>;

#[cfg(feature = "desktop")]
pub type SharedMatchList = std::sync::Arc<tokio::sync::RwLock<MatchList<AppMatchStore>>>;
