use gloo_timers::future::sleep;
use std::time::Duration;

use super::*;

pub(super) struct DomShell;

impl rateme_app_state::Shell for DomShell {
    fn render(&self, state: &ViewState) {
        if let Err(error) = dom::render_view(state) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("render failed: {error}")));
        }
    }

    fn notify(&self, notice: Notice) {
        match dom::show_toast(&notice) {
            Ok(toast) => spawn_local(async move {
                sleep(Duration::from_millis(TOAST_LIFETIME_MS)).await;
                toast.remove();
            }),
            Err(error) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "toast failed ({error}): {}",
                    notice.message
                )));
            }
        }
    }

    fn open_external(&self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if window
            .open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
            .is_err()
        {
            web_sys::console::warn_1(&JsValue::from_str(&format!("failed to open {url}")));
        }
    }

    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(error) = window.location().reload() {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "reload failed: {error:?}"
            )));
        }
    }
}
