pub(crate) const RUNTIME_CONFIG_GLOBAL: &str = "__RATEME_CONFIG__";
pub(crate) const TOAST_LIFETIME_MS: u64 = 4_000;

pub(crate) const APP_ROOT_ID: &str = "rateme-web-shell";
pub(crate) const HEADER_CONTROLS_ID: &str = "rateme-header-controls";
pub(crate) const MODEL_BUTTONS_ID: &str = "rateme-model-buttons";
pub(crate) const MODEL_INFO_ID: &str = "rateme-model-info";
pub(crate) const PRODUCT_INPUT_ID: &str = "rateme-product-input";
pub(crate) const SUBMIT_BUTTON_ID: &str = "rateme-submit";
pub(crate) const SUBMIT_ICON_ID: &str = "rateme-submit-icon";
pub(crate) const LOADING_OVERLAY_ID: &str = "rateme-loading";
pub(crate) const MODAL_ROOT_ID: &str = "rateme-modal";
pub(crate) const MODAL_SUBMIT_ID: &str = "rateme-modal-submit";
pub(crate) const MODAL_FIELD_ID_PREFIX: &str = "rateme-modal-field-";
pub(crate) const TOAST_STACK_ID: &str = "rateme-toasts";

pub(crate) const ACCENT_COLOR: &str = "#7c3aed";
pub(crate) const SUCCESS_COLOR: &str = "#16a34a";
pub(crate) const ERROR_COLOR: &str = "#dc2626";
