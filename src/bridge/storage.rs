//! Persisted calibration mapping
//!
//! The mapping round-trips through localStorage as a JSON record of
//! exactly the six `LinearMapping` coefficients. Persistence is
//! fire-and-forget: a failed write is logged and dropped, and a missing
//! or corrupt record loads as "no mapping" (pass-through mode).

use crate::tracking::LinearMapping;

/// localStorage key for the mapping record
pub const STORAGE_KEY: &str = "gaze-web.mapping";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Persist the fitted mapping, overwriting any prior record
pub fn save_mapping(mapping: &LinearMapping) {
    let json = match serde_json::to_string(mapping) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("Failed to serialize mapping: {}", e).into());
            return;
        }
    };

    match local_storage() {
        Some(storage) => {
            if storage.set_item(STORAGE_KEY, &json).is_err() {
                web_sys::console::warn_1(&"Failed to write mapping to localStorage".into());
            }
        }
        None => {
            web_sys::console::warn_1(&"localStorage unavailable; mapping not persisted".into());
        }
    }
}

/// Load the persisted mapping
///
/// Absent and corrupt records are both `None` — the pipeline simply
/// runs uncalibrated until the next session.
pub fn load_mapping() -> Option<LinearMapping> {
    let storage = local_storage()?;
    let json = storage.get_item(STORAGE_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(mapping) => Some(mapping),
        Err(_) => {
            web_sys::console::warn_1(&"Stored mapping is corrupt; ignoring it".into());
            None
        }
    }
}

/// Remove the persisted record (user cleared their calibration)
pub fn clear_stored_mapping() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
