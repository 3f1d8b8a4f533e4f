//! Game settings and preferences
//!
//! Persisted separately from tuning and high scores.

use serde::{Deserialize, Serialize};

use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::platform::{self, Slot};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    /// Show the tuning panel at startup
    pub show_panel: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Assets ===
    /// Directory (native) or URL prefix (web) holding images/, sounds/, fonts/
    pub asset_root: String,

    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            fullscreen: false,
            show_panel: true,

            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,

            asset_root: "data".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    const SLOT: Slot = Slot {
        local_storage_key: "tri_invaders_settings",
        file_name: "settings.json",
    };

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        match platform::load_json::<Self>(Self::SLOT) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        match platform::save_json(Self::SLOT, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    /// Clamp hand-edited values into range
    pub fn sanitized(mut self) -> Self {
        self.window_width = self.window_width.max(320);
        self.window_height = self.window_height.max(240);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Path or URL of an asset relative to `asset_root`
    pub fn asset_path(&self, relative: &str) -> String {
        let root = self.asset_root.trim_end_matches('/');
        if root.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{}", root, relative)
        }
    }
}
