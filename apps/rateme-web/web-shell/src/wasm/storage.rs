use rateme_client_core::auth::LOGIN_STORAGE_KEY;

use super::*;

/// Per-tab `sessionStorage`; the login dies with the tab.
pub(super) struct BrowserSessionStore;

impl BrowserSessionStore {
    fn storage() -> Result<web_sys::Storage, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        window
            .session_storage()
            .map_err(|_| "failed to access session storage".to_string())?
            .ok_or_else(|| "session storage is unavailable".to_string())
    }
}

impl SessionStore for BrowserSessionStore {
    type Error = String;

    fn load_login(&self) -> Result<Option<String>, Self::Error> {
        Self::storage()?
            .get_item(LOGIN_STORAGE_KEY)
            .map_err(|_| "failed to read session login".to_string())
    }

    fn persist_login(&self, login: &str) -> Result<(), Self::Error> {
        Self::storage()?
            .set_item(LOGIN_STORAGE_KEY, login)
            .map_err(|_| "failed to persist session login".to_string())
    }

    fn clear_login(&self) -> Result<(), Self::Error> {
        Self::storage()?
            .remove_item(LOGIN_STORAGE_KEY)
            .map_err(|_| "failed to clear session login".to_string())
    }
}
