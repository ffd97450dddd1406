#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rateme_api_client::HttpPredictionApi;
    use rateme_app_state::{
        FormValues, HeaderControl, Modal, ModalBody, Notice, NoticeLevel, UiCommand,
        ViewController, ViewState,
    };
    use rateme_client_core::{ModelOption, SessionStore};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlElement, HtmlImageElement, HtmlInputElement};

    use crate::wasm_constants::*;

    mod config;
    mod dom;
    mod shell;
    mod storage;

    use config::load_app_config;
    use dom::{attach_static_handlers, ensure_page_dom};
    use shell::DomShell;
    use storage::BrowserSessionStore;

    type PageController = ViewController<HttpPredictionApi, BrowserSessionStore, DomShell>;

    thread_local! {
        static CONTROLLER: RefCell<Option<Rc<PageController>>> = const { RefCell::new(None) };
        static STATIC_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static INPUT_KEYDOWN_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::KeyboardEvent)>>> = const { RefCell::new(None) };
        static HEADER_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static MODEL_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static MODAL_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static RENDERED_HEADER: RefCell<Option<Vec<HeaderControl>>> = const { RefCell::new(None) };
        static RENDERED_MODELS: RefCell<Option<Vec<ModelOption>>> = const { RefCell::new(None) };
        static RENDERED_MODAL: RefCell<Option<Modal>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if let Err(error) = boot() {
            report_boot_error(&error);
        }
    }

    fn boot() -> Result<(), String> {
        let config = load_app_config()?;
        ensure_page_dom()?;

        let api = HttpPredictionApi::from_app_config(&config).map_err(|error| error.to_string())?;
        let controller = ViewController::new(&config, api, BrowserSessionStore, DomShell)
            .map_err(|error| error.to_string())?;
        let controller = Rc::new(controller);
        CONTROLLER.with(|slot| {
            *slot.borrow_mut() = Some(Rc::clone(&controller));
        });

        attach_static_handlers()?;
        spawn_local(async move {
            controller.bootstrap().await;
        });
        Ok(())
    }

    fn report_boot_error(message: &str) {
        web_sys::console::error_1(&JsValue::from_str(&format!(
            "rateme web shell failed to start: {message}"
        )));
    }

    /// Every DOM callback funnels through here; the controller runs the
    /// command on the event loop so callbacks never re-enter it.
    pub(super) fn dispatch(command: UiCommand) {
        let Some(controller) = CONTROLLER.with(|slot| slot.borrow().clone()) else {
            return;
        };
        spawn_local(async move {
            controller.handle(command).await;
        });
    }

    #[wasm_bindgen]
    pub fn view_state_json() -> String {
        CONTROLLER
            .with(|slot| {
                slot.borrow()
                    .as_ref()
                    .and_then(|controller| serde_json::to_string(&controller.state()).ok())
            })
            .unwrap_or_else(|| "{}".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::view_state_json;

/// Initial view state for the environment's configuration, for tooling that
/// runs outside a browser.
#[cfg(not(target_arch = "wasm32"))]
pub fn view_state_json() -> String {
    use rateme_app_state::ViewState;
    use rateme_client_core::{AppConfig, SessionState};

    match AppConfig::from_env() {
        Ok(config) => {
            let state = ViewState::new(
                SessionState::Anonymous,
                config.default_model.as_ref(),
                config.upload_page_enabled,
            );
            serde_json::to_string(&state).unwrap_or_else(|_| "{}".to_string())
        }
        Err(error) => serde_json::json!({ "error": error.to_string() }).to_string(),
    }
}
