//! Player preferences
//!
//! Persisted separately from anything gameplay related in LocalStorage.
//! Game progress itself is never saved.

use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend origin; `/api/...` is appended per request
    pub api_base_url: String,
    /// Name typed last time, to prefill the entry screen
    pub last_player_name: String,

    // === Accessibility ===
    /// Draw the character solid while invulnerable instead of flickering
    pub reduced_flashing: bool,

    // === HUD ===
    /// Show the difficulty multiplier line
    pub show_difficulty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            last_player_name: String::new(),
            reduced_flashing: false,
            show_difficulty: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "stomp_run_settings";

    /// Parse stored JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Discarding unreadable settings: {}", e);
                None
            }
        }
    }

    /// Remember the name for next time; blank names are not stored
    pub fn remember_player(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.last_player_name = name.to_string();
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"reduced_flashing":true}"#).unwrap();
        assert!(settings.reduced_flashing);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert!(settings.show_difficulty);
    }

    #[test]
    fn test_garbage_json_is_rejected() {
        assert!(Settings::from_json("{nope").is_none());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let mut settings = Settings::default();
        settings.remember_player("  Toad ");
        settings.api_base_url = "https://api.example.com".into();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), Some(settings));
    }

    #[test]
    fn test_blank_name_not_remembered() {
        let mut settings = Settings::default();
        settings.remember_player("Peach");
        settings.remember_player("   ");
        assert_eq!(settings.last_player_name, "Peach");
    }
}
