use std::collections::BTreeMap;

use rateme_client_core::{HistoryEntry, RemoteId};
use serde::Serialize;

use crate::messages::{
    FIELD_LOGIN, FIELD_NAME, FIELD_PASSWORD, HISTORY_TITLE, LOGIN_SUBMIT, LOGIN_TITLE,
    REGISTER_SUBMIT, REGISTER_TITLE, history_row_label,
};

pub const FIELD_KEY_NAME: &str = "name";
pub const FIELD_KEY_LOGIN: &str = "login";
pub const FIELD_KEY_PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Register,
    Login,
    History,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub secret: bool,
}

impl FormField {
    const fn text(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            placeholder,
            secret: false,
        }
    }

    const fn secret(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            placeholder,
            secret: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub id: RemoteId,
    pub label: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            label: history_row_label(&entry.created_at, &entry.id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModalBody {
    Form {
        fields: Vec<FormField>,
        submit_label: &'static str,
    },
    History {
        rows: Vec<HistoryRow>,
    },
}

/// One modal shape for every popup: a title, a close affordance, and a body
/// that is either a form with a submit button or a list of clickable rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: &'static str,
    pub body: ModalBody,
}

impl Modal {
    pub fn register() -> Self {
        Self {
            kind: ModalKind::Register,
            title: REGISTER_TITLE,
            body: ModalBody::Form {
                fields: vec![
                    FormField::text(FIELD_KEY_NAME, FIELD_NAME),
                    FormField::text(FIELD_KEY_LOGIN, FIELD_LOGIN),
                    FormField::secret(FIELD_KEY_PASSWORD, FIELD_PASSWORD),
                ],
                submit_label: REGISTER_SUBMIT,
            },
        }
    }

    pub fn login() -> Self {
        Self {
            kind: ModalKind::Login,
            title: LOGIN_TITLE,
            body: ModalBody::Form {
                fields: vec![
                    FormField::text(FIELD_KEY_LOGIN, FIELD_LOGIN),
                    FormField::secret(FIELD_KEY_PASSWORD, FIELD_PASSWORD),
                ],
                submit_label: LOGIN_SUBMIT,
            },
        }
    }

    pub fn history(entries: &[HistoryEntry]) -> Self {
        Self {
            kind: ModalKind::History,
            title: HISTORY_TITLE,
            body: ModalBody::History {
                rows: entries.iter().map(HistoryRow::from).collect(),
            },
        }
    }

    pub fn fields(&self) -> &[FormField] {
        match &self.body {
            ModalBody::Form { fields, .. } => fields,
            ModalBody::History { .. } => &[],
        }
    }
}

/// Raw values collected from a form modal, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Missing fields read as empty, which the credential checks reject.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }
}
