//! View layer of the Rate me! front-end: what is on screen ([`ViewState`]),
//! how it changes ([`apply_action`]), and the [`ViewController`] that turns
//! user commands into API calls and state transitions.

pub mod controller;
pub mod messages;
pub mod modal;
pub mod state;

pub use controller::{Shell, UiCommand, ViewController};
pub use messages::{ApiAction, api_failure_message};
pub use modal::{FormField, FormValues, HistoryRow, Modal, ModalBody, ModalKind};
pub use state::{
    HeaderControl, InputAffordance, Notice, NoticeLevel, ViewAction, ViewState, apply_action,
};
