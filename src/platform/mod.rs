//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (timestamps only; the sim keeps its own clock)
//! - Storage (LocalStorage on web, JSON files in the working directory on native)

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Where one persisted document lives on each platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub local_storage_key: &'static str,
    pub file_name: &'static str,
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Load and parse a document. Missing or corrupt data yields `None`.
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: DeserializeOwned>(slot: Slot) -> Option<T> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()?;
    let json = storage.get_item(slot.local_storage_key).ok().flatten()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", slot.local_storage_key, e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save_json<T: Serialize>(slot: Slot, value: &T) -> Result<(), String> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or_else(|| "LocalStorage unavailable".to_string())?;
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    storage
        .set_item(slot.local_storage_key, &json)
        .map_err(|e| format!("{:?}", e))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: DeserializeOwned>(slot: Slot) -> Option<T> {
    let json = std::fs::read_to_string(slot.file_name).ok()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt {}: {}", slot.file_name, e);
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: Serialize>(slot: Slot, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    std::fs::write(slot.file_name, json).map_err(|e| format!("{}: {}", slot.file_name, e))
}
