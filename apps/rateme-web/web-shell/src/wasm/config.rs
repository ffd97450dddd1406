use std::collections::HashMap;

use rateme_client_core::AppConfig;
use rateme_client_core::config::CONFIG_KEYS;

use super::*;

/// Reads `window.__RATEME_CONFIG__`, a plain object keyed like the native
/// environment. A missing object means defaults.
pub(super) fn load_app_config() -> Result<AppConfig, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let global = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_GLOBAL))
        .map_err(|_| "failed to read runtime config".to_string())?;

    let mut values = HashMap::new();
    if global.is_object() {
        for key in CONFIG_KEYS {
            let Ok(value) = js_sys::Reflect::get(&global, &JsValue::from_str(key)) else {
                continue;
            };
            let text = value
                .as_string()
                .or_else(|| value.as_f64().map(|number| number.to_string()))
                .or_else(|| value.as_bool().map(|flag| flag.to_string()));
            if let Some(text) = text {
                values.insert(key, text);
            }
        }
    }

    AppConfig::from_lookup(|key| values.get(key).cloned()).map_err(|error| error.to_string())
}
