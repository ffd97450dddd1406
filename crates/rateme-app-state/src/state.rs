use rateme_client_core::catalog::builtin_models;
use rateme_client_core::{ModelKey, ModelOption, ModelOrigin, SessionState};
use serde::Serialize;

use crate::messages::{
    HEADER_HISTORY, HEADER_LOGIN, HEADER_LOGOUT, HEADER_REGISTER, HEADER_UPLOAD_MODEL,
};
use crate::modal::Modal;

pub const ICON_UPLOAD: &str = "svgs/upload.svg";
pub const ICON_SUBMIT: &str = "svgs/pointer.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderControl {
    Register,
    Login,
    History,
    UploadModel,
    Logout,
}

impl HeaderControl {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Register => HEADER_REGISTER,
            Self::Login => HEADER_LOGIN,
            Self::History => HEADER_HISTORY,
            Self::UploadModel => HEADER_UPLOAD_MODEL,
            Self::Logout => HEADER_LOGOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAffordance {
    Upload,
    Submit,
}

impl InputAffordance {
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Upload => ICON_UPLOAD,
            Self::Submit => ICON_SUBMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the render layer draws. Only [`apply_action`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub session: SessionState,
    pub models: Vec<ModelOption>,
    pub selected_model: Option<ModelKey>,
    pub input: String,
    /// Requests in flight. Overlapping submissions are allowed, so the
    /// overlay stays up until the last one settles.
    pub pending_requests: u32,
    pub modal: Option<Modal>,
    pub upload_page_enabled: bool,
}

impl ViewState {
    pub fn new(
        session: SessionState,
        default_model: Option<&ModelKey>,
        upload_page_enabled: bool,
    ) -> Self {
        let models = builtin_models();
        let selected_model = default_model
            .filter(|key| models.iter().any(|option| &option.key == *key))
            .cloned();
        Self {
            session,
            models,
            selected_model,
            input: String::new(),
            pending_requests: 0,
            modal: None,
            upload_page_enabled,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }

    pub fn header_controls(&self) -> Vec<HeaderControl> {
        if !self.session.is_authenticated() {
            return vec![HeaderControl::Register, HeaderControl::Login];
        }
        let mut controls = vec![HeaderControl::History];
        if self.upload_page_enabled {
            controls.push(HeaderControl::UploadModel);
        }
        controls.push(HeaderControl::Logout);
        controls
    }

    pub fn input_affordance(&self) -> InputAffordance {
        if self.input.trim().is_empty() {
            InputAffordance::Upload
        } else {
            InputAffordance::Submit
        }
    }

    pub fn selected_option(&self) -> Option<&ModelOption> {
        let key = self.selected_model.as_ref()?;
        self.models.iter().find(|option| &option.key == key)
    }

    pub fn is_selected(&self, key: &ModelKey) -> bool {
        self.selected_model.as_ref() == Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SessionEstablished { login: String },
    SessionCleared,
    ModelSelected { key: ModelKey },
    UserModelDiscovered { option: ModelOption },
    InputChanged { value: String },
    LoadingStarted,
    LoadingFinished,
    ModalOpened { modal: Modal },
    ModalClosed,
}

/// Applies one transition and reports whether anything visible changed.
pub fn apply_action(state: &mut ViewState, action: ViewAction) -> bool {
    match action {
        ViewAction::SessionEstablished { login } => {
            let next = SessionState::Authenticated { login };
            if state.session == next {
                return false;
            }
            state.session = next;
            true
        }
        ViewAction::SessionCleared => {
            let had_user_models = state
                .models
                .iter()
                .any(|option| option.origin == ModelOrigin::User);
            state
                .models
                .retain(|option| option.origin == ModelOrigin::Builtin);
            if state.selected_option().is_none() {
                state.selected_model = None;
            }
            let was_authenticated = state.session.is_authenticated();
            state.session = SessionState::Anonymous;
            was_authenticated || had_user_models
        }
        ViewAction::ModelSelected { key } => {
            if state.is_selected(&key) || !state.models.iter().any(|option| option.key == key) {
                return false;
            }
            state.selected_model = Some(key);
            true
        }
        ViewAction::UserModelDiscovered { option } => {
            if state.models.contains(&option) {
                return false;
            }
            let replaced_selected = state.models.iter().any(|existing| {
                existing.origin == ModelOrigin::User && state.is_selected(&existing.key)
            });
            state
                .models
                .retain(|existing| existing.origin == ModelOrigin::Builtin);
            if replaced_selected {
                state.selected_model = None;
            }
            state.models.push(option);
            true
        }
        ViewAction::InputChanged { value } => {
            if state.input == value {
                return false;
            }
            state.input = value;
            true
        }
        ViewAction::LoadingStarted => {
            state.pending_requests = state.pending_requests.saturating_add(1);
            true
        }
        ViewAction::LoadingFinished => {
            if state.pending_requests == 0 {
                return false;
            }
            state.pending_requests -= 1;
            true
        }
        ViewAction::ModalOpened { modal } => {
            state.modal = Some(modal);
            true
        }
        ViewAction::ModalClosed => state.modal.take().is_some(),
    }
}
