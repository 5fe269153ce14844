use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_FILE: &str = "matches.json";
pub const DEFAULT_STORE_KEY: &str = "matches";

const STORE_FILE_ENV: &str = "REPLAY_COMPANION_STORE_FILE";
const STORE_KEY_ENV: &str = "REPLAY_COMPANION_STORE_KEY";
const PERSIST_ENV: &str = "REPLAY_COMPANION_PERSIST";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchListSettings {
    pub store_file: String,
    pub store_key: String,
    pub persist: bool,
}

impl Default for MatchListSettings {
    fn default() -> Self {
        Self {
            store_file: DEFAULT_STORE_FILE.to_string(),
            store_key: DEFAULT_STORE_KEY.to_string(),
            persist: true,
        }
    }
}

impl MatchListSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(store_file) = non_empty(lookup(STORE_FILE_ENV)) {
            settings.store_file = store_file;
        }

        if let Some(store_key) = non_empty(lookup(STORE_KEY_ENV)) {
            settings.store_key = store_key;
        }

        if let Some(persist) = lookup(PERSIST_ENV).as_deref().and_then(parse_flag) {
            settings.persist = persist;
        }

        settings
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
